use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use rwa_dex::common::parse::{parse_address, parse_positive_base_units};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{checksummed, hex_data};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MintBody {
    pub to: Option<String>,
    pub amount: Option<String>,
    /// Falls back to the configured RWA token.
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintResponse {
    pub ok: bool,
    pub token: String,
    pub to: String,
    pub amount: String,
    pub tx_hash: String,
    pub status: &'static str,
    pub gas_used: String,
}

/// POST /token/mint-erc20, admin only. Waits for the receipt.
#[instrument(skip_all)]
pub async fn mint_erc20(
    State(state): State<AppState>,
    body: Result<Json<MintBody>, JsonRejection>,
) -> Result<Json<MintResponse>, ApiError> {
    let Json(body) = body?;
    let to = parse_address("to", body.to.as_deref())?;
    let amount = parse_positive_base_units("amount", body.amount.as_deref())?;
    let token = match body.token.as_deref() {
        Some(raw) => Some(parse_address("token", Some(raw))?),
        None => None,
    };

    let receipt = state.gateway.mint(token, to, amount).await?;
    let tx_hash = hex_data(receipt.tx_hash.as_slice());
    if !receipt.success {
        return Err(ApiError::BadGateway(format!("mint transaction {tx_hash} reverted")));
    }
    info!(token = %receipt.token, %to, %amount, %tx_hash, "minted");

    Ok(Json(MintResponse {
        ok: true,
        token: checksummed(receipt.token),
        to: checksummed(receipt.to),
        amount: receipt.amount.to_string(),
        tx_hash,
        status: "success",
        gas_used: receipt.gas_used,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::test_support::*;

    #[tokio::test]
    async fn test_mint_success() {
        let request = post_json(
            "/token/mint-erc20",
            json!({ "to": USER, "amount": "5000000000000000000" }),
            Some(ADMIN_KEY),
        );
        let (status, body) = send(app(MockGateway::default()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "ok": true,
                "token": address(TOKEN_A).to_checksum(None),
                "to": USER,
                "amount": "5000000000000000000",
                "txHash": format!("0x{}", "22".repeat(32)),
                "status": "success",
                "gasUsed": "51234",
            })
        );
    }

    #[tokio::test]
    async fn test_mint_explicit_token() {
        let request = post_json(
            "/token/mint-erc20",
            json!({ "to": USER, "amount": "1", "token": TOKEN_B }),
            Some(ADMIN_KEY),
        );
        let (status, body) = send(app(MockGateway::default()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().unwrap().eq_ignore_ascii_case(TOKEN_B));
    }

    #[tokio::test]
    async fn test_mint_reverted_is_bad_gateway() {
        let gateway = MockGateway { mint_succeeds: false, ..Default::default() };
        let body = json!({ "to": USER, "amount": "1" });
        let request = post_json("/token/mint-erc20", body, Some(ADMIN_KEY));
        let (status, body) = send(app(gateway), request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_mint_rejections() {
        for body in [
            json!({ "to": USER, "amount": "0" }),
            json!({ "to": USER }),
            json!({ "to": "0x12", "amount": "1" }),
            json!({ "to": USER, "amount": "1", "token": "bad" }),
        ] {
            let request = post_json("/token/mint-erc20", body.clone(), Some(ADMIN_KEY));
            let (status, _) = send(app(MockGateway::default()), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        }

        let request = post_json("/token/mint-erc20", json!({ "to": USER, "amount": "1" }), None);
        let (status, _) = send(app(MockGateway::default()), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let gateway = MockGateway { signer: false, ..Default::default() };
        let body = json!({ "to": USER, "amount": "1" });
        let request = post_json("/token/mint-erc20", body, Some(ADMIN_KEY));
        let (status, _) = send(app(gateway), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
