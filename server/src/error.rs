use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rwa_dex::common::parse::ParseError;
use rwa_dex::core_sdk::currency::TokenError;
use rwa_dex::kyc_sdk::kyc_registry::KycRegistryError;
use rwa_dex::universal_router_sdk::swap_calldata::SwapCalldataError;
use rwa_dex::v3_sdk::spot_quote::SpotQuoteError;
use rwa_dex::v3_sdk::uniswapv3_pool::PoolReadError;
use rwa_dex::v3_sdk::uniswapv3_quoter::UniswapV3QuoterError;
use serde_json::json;
use tracing::warn;

/// Every failure leaves the server as `{ "ok": false, "reason": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or out-of-range input, or a non-positive computed amount.
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    /// The pool does not hold the requested pair.
    #[error("{0}")]
    NotFound(String),
    /// A transaction was sent and failed.
    #[error("{0}")]
    BadGateway(String),
    /// RPC node or contract unreachable, or a write path with no signer.
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(%status, reason = %self, "request failed upstream");
        }
        let body = json!({
            "ok": false,
            "reason": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::BadRequest(err.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        Self::BadRequest(err.body_text())
    }
}

impl From<PoolReadError> for ApiError {
    fn from(err: PoolReadError) -> Self {
        Self::ServiceUnavailable(err.to_string())
    }
}

impl From<SpotQuoteError> for ApiError {
    fn from(err: SpotQuoteError) -> Self {
        match err {
            SpotQuoteError::NonPositiveAmount | SpotQuoteError::InvalidFee(_) => {
                Self::BadRequest(err.to_string())
            }
            SpotQuoteError::PairMismatch => Self::NotFound(err.to_string()),
        }
    }
}

impl From<SwapCalldataError> for ApiError {
    fn from(err: SwapCalldataError) -> Self {
        match err {
            SwapCalldataError::PairMismatch => Self::NotFound(err.to_string()),
            _ => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<UniswapV3QuoterError> for ApiError {
    fn from(err: UniswapV3QuoterError) -> Self {
        match err {
            UniswapV3QuoterError::WrongPoolFee(_) => Self::BadRequest(err.to_string()),
            _ => Self::ServiceUnavailable(err.to_string()),
        }
    }
}

impl From<KycRegistryError> for ApiError {
    fn from(err: KycRegistryError) -> Self {
        match err {
            KycRegistryError::InvalidStatus(_) => Self::BadRequest(err.to_string()),
            _ => Self::ServiceUnavailable(err.to_string()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Mint(_) | TokenError::InvalidRpcUrl(_) => Self::BadGateway(err.to_string()),
            TokenError::NotConfigured(_) => Self::ServiceUnavailable(err.to_string()),
        }
    }
}
