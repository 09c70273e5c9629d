//! HTTP surface of the RWA DEX backend.
//!
//! - KYC registry reads and admin writes
//! - spot quotes, on-chain quotes and universal-router swap calldata
//! - admin ERC-20 mints
//! - a liveness check

/// Admin-key guard.
pub mod auth;
/// Error type and its JSON mapping.
pub mod error;
/// Request handlers.
pub mod handlers;
/// Route definitions.
pub mod routes;
/// Server configuration and startup.
pub mod server;
/// Application state.
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use server::{ApiServer, ServerConfig};
pub use state::AppState;
