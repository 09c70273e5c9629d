use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::require_admin_key;
use crate::handlers::{dex, health, kyc, token};
use crate::state::AppState;

/// Builds the full router. Admin routes sit behind [`require_admin_key`].
pub fn create_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/kyc/set", post(kyc::set_status))
        .route("/token/mint-erc20", post(token::mint_erc20))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin_key));

    Router::new()
        .route("/status", get(health::status))
        .route("/kyc/{address}", get(kyc::get_status))
        .route("/dex/quote", get(dex::quote_handler))
        .route("/dex/quote-spot", get(dex::quote_spot_handler))
        .route("/dex/swap-calldata", post(dex::swap_calldata_handler))
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
