pub mod spot_quote;
pub mod uniswapv3_pool;
pub mod uniswapv3_quoter;
