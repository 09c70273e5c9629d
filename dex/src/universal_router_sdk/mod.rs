pub mod swap_calldata;
pub mod universal_router_commands;
pub mod universal_router_execute;
