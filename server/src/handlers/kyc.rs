use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use rwa_dex::common::parse::parse_address;
use rwa_dex::kyc_sdk::kyc_registry::KycStatus;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{checksummed, hex_data};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct KycStatusResponse {
    pub address: String,
    /// Raw registry value, may fall outside the known statuses.
    pub status: u8,
}

/// GET /kyc/{address}
#[instrument(skip(state))]
pub async fn get_status(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<KycStatusResponse>, ApiError> {
    let user = parse_address("address", Some(&address))?;
    let status = state.gateway.kyc_status(user).await?;
    Ok(Json(KycStatusResponse {
        address: checksummed(user),
        status,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SetStatusBody {
    pub address: Option<String>,
    pub status: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusResponse {
    pub ok: bool,
    pub tx_hash: String,
}

/// POST /kyc/set, admin only.
#[instrument(skip_all)]
pub async fn set_status(
    State(state): State<AppState>,
    body: Result<Json<SetStatusBody>, JsonRejection>,
) -> Result<Json<SetStatusResponse>, ApiError> {
    let Json(body) = body?;
    let user = parse_address("address", body.address.as_deref())?;
    let raw = body
        .status
        .ok_or_else(|| ApiError::BadRequest("missing status".to_string()))?;
    let status = KycStatus::try_from(raw)?;

    let tx_hash = state.gateway.set_kyc_status(user, status).await?;
    info!(%user, ?status, %tx_hash, "kyc status change requested");
    Ok(Json(SetStatusResponse {
        ok: true,
        tx_hash: hex_data(tx_hash.as_slice()),
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::http::StatusCode;
    use rwa_dex::kyc_sdk::kyc_registry::KycStatus;
    use serde_json::json;

    use super::super::test_support::*;

    #[tokio::test]
    async fn test_get_status_returns_raw_value() {
        let gateway = MockGateway {
            kyc: HashMap::from([(address(USER), 7)]),
            ..Default::default()
        };
        let uri = format!("/kyc/{}", USER.to_lowercase());
        let (status, body) = send(app(gateway), get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "address": USER, "status": 7 }));
    }

    #[tokio::test]
    async fn test_get_status_unknown_user_is_zero() {
        let uri = format!("/kyc/{TOKEN_A}");
        let (status, body) = send(app(MockGateway::default()), get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], 0);
    }

    #[tokio::test]
    async fn test_get_status_rejects_bad_address() {
        let (status, body) = send(app(MockGateway::default()), get("/kyc/0x1234")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_set_status_writes_through_gateway() {
        let gateway = Arc::new(MockGateway::default());
        let body = json!({ "address": USER, "status": 2 });
        let request = post_json("/kyc/set", body, Some(ADMIN_KEY));
        let (status, body) = send(app_with(gateway.clone(), Some(ADMIN_KEY)), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["txHash"], format!("0x{}", "11".repeat(32)));
        assert_eq!(
            *gateway.kyc_writes.lock().unwrap(),
            vec![(address(USER), KycStatus::Blacklisted)]
        );
    }

    #[tokio::test]
    async fn test_set_status_rejections() {
        let gateway = Arc::new(MockGateway::default());
        for body in [
            json!({ "address": USER, "status": 3 }),
            json!({ "address": USER }),
            json!({ "address": "nope", "status": 1 }),
            json!({ "status": 1 }),
            json!({ "address": USER, "status": -1 }),
        ] {
            let request = post_json("/kyc/set", body.clone(), Some(ADMIN_KEY));
            let (status, _) = send(app_with(gateway.clone(), Some(ADMIN_KEY)), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        }
        assert!(gateway.kyc_writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_status_requires_admin_key() {
        let gateway = Arc::new(MockGateway::default());
        let body = json!({ "address": USER, "status": 1 });
        for key in [None, Some("wrong-key")] {
            let request = post_json("/kyc/set", body.clone(), key);
            let app = app_with(gateway.clone(), Some(ADMIN_KEY));
            let (status, response) = send(app, request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(response["reason"], "Invalid admin key");
        }

        let request = post_json("/kyc/set", body, Some(ADMIN_KEY));
        let (status, _) = send(app_with(gateway.clone(), None), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(gateway.kyc_writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_status_without_signer() {
        let gateway = MockGateway { signer: false, ..Default::default() };
        let body = json!({ "address": USER, "status": 1 });
        let request = post_json("/kyc/set", body, Some(ADMIN_KEY));
        let (status, _) = send(app(gateway), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
