pub mod common;
pub mod config;
pub mod core_sdk;
pub mod gateway;
pub mod kyc_sdk;
pub mod universal_router_sdk;
pub mod v3_sdk;
