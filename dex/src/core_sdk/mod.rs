pub mod chain;
pub mod currency;
