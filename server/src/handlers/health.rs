use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub service: &'static str,
    /// Unix milliseconds.
    pub ts: i64,
}

/// GET /status
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        ok: true,
        service: "backend",
        ts: Utc::now().timestamp_millis(),
    })
}
