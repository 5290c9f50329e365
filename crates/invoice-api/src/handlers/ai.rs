//! `POST /api/ai/generate`
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use invoice_draft::{FailureKind, GenerationOutcome};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::AppState;

const NO_API_KEY_MESSAGE: &str = "Server misconfiguration: no Gemini API key found. \
     Set GEMINI_API_KEY or GOOGLE_API_KEY in .env";

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

pub async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    // An unreadable body is answered like a missing prompt.
    let prompt = body.ok().and_then(|Json(b)| b.prompt).unwrap_or_default();

    let outcome = state.generator.generate_draft(&prompt).await;
    state.metrics.record_generation(outcome.label());

    let (status, body) = outcome_response(outcome);
    (status, Json(body))
}

fn outcome_response(outcome: GenerationOutcome) -> (StatusCode, Value) {
    let model = outcome.model_used().map(str::to_string);
    let raw = outcome.raw_text().map(str::to_string);
    let detail = outcome.detail().map(str::to_string);

    match outcome.failure() {
        None => (
            StatusCode::OK,
            json!({ "success": true, "model": model, "data": outcome.into_data() }),
        ),
        Some(FailureKind::NoApiKey) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "success": false, "message": NO_API_KEY_MESSAGE }),
        ),
        Some(FailureKind::EmptyPrompt) => (
            StatusCode::BAD_REQUEST,
            json!({ "success": false, "message": "Prompt text required" }),
        ),
        Some(FailureKind::AllModelsFailed) => (
            StatusCode::BAD_GATEWAY,
            json!({ "success": false, "message": "AI generation failed", "detail": detail }),
        ),
        Some(FailureKind::NoJsonFound) => (
            StatusCode::BAD_GATEWAY,
            json!({
                "success": false,
                "message": "AI returned malformed response (no JSON found)",
                "raw": raw,
                "model": model,
            }),
        ),
        Some(FailureKind::MalformedJson) => (
            StatusCode::BAD_GATEWAY,
            json!({
                "success": false,
                "message": "AI returned invalid JSON",
                "model": model,
                "raw": raw,
                "detail": detail,
            }),
        ),
    }
}
