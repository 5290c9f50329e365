use axum::{extract::State, http::StatusCode, Json};
use invoice_core::INVOICE_VERSION;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn banner() -> &'static str {
    "Invoice API is running"
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": INVOICE_VERSION })),
    )
}

pub async fn metrics(State(state): State<AppState>) -> ApiResult<String> {
    state
        .metrics
        .encode()
        .map_err(|e| ApiError::Internal(format!("metrics encoding failed: {e}")))
}
