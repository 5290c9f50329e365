//! Tests for REST API endpoints

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use invoice_api::{
    auth::StaticTokenVerifier, create_app, uploads::UploadStore, AppState, ServerConfig,
};
use invoice_draft::{DraftGenerator, GenerativeModel, ProviderError};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const ALICE: &str = "alice-token";
const BOB: &str = "bob-token";
const BOUNDARY: &str = "invoice-test-boundary";

/// Returns the same reply for every model.
struct FixedModel(Result<Value, ProviderError>);

#[async_trait]
impl GenerativeModel for FixedModel {
    async fn generate(&self, _model: &str, _prompt: &str) -> Result<Value, ProviderError> {
        self.0.clone()
    }
}

struct TestApp {
    router: Router,
    uploads: TempDir,
}

impl TestApp {
    fn new(generator: DraftGenerator) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let tokens = HashMap::from([
            (ALICE.to_string(), "alice".to_string()),
            (BOB.to_string(), "bob".to_string()),
        ]);
        let state = AppState::in_memory(
            generator,
            Arc::new(StaticTokenVerifier::new(tokens)),
            UploadStore::new(uploads.path()),
        )
        .unwrap();
        let router = create_app(state, &ServerConfig::default());
        Self { router, uploads }
    }

    fn with_reply(reply: Result<Value, ProviderError>) -> Self {
        Self::new(DraftGenerator::with_default_candidates(Some(Arc::new(
            FixedModel(reply),
        ))))
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn stored_files(&self) -> usize {
        std::fs::read_dir(self.uploads.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    async fn send_text(&self, req: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&body).to_string())
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn generate_request(body: Value) -> Request<Body> {
    json_request("POST", "/api/ai/generate", None, body)
}

fn multipart_request(
    method: &str,
    uri: &str,
    token: &str,
    parts: &[(&str, Option<&str>, &str)],
) -> Request<Body> {
    let mut body = String::new();
    for (name, file_name, value) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match file_name {
            Some(file) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )),
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// =============================================================================
// Public routes
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new(DraftGenerator::unconfigured());
    let (status, body) = app.send(get_request("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, banner) = app.send_text(get_request("/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(banner, "Invoice API is running");
}

// =============================================================================
// AI drafts
// =============================================================================

#[tokio::test]
async fn test_generate_is_public() {
    let app = TestApp::with_reply(Ok(json!({ "text": "{\"notes\":\"x\"}" })));

    let (status, body) = app.send(generate_request(json!({ "prompt": "x" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notes"], "x");

    // A stale token does not matter on this route.
    let (status, _) = app
        .send(json_request("POST", "/api/ai/generate", Some("nope"), json!({ "prompt": "x" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    // Record routes stay behind authentication.
    let (status, body) = app.send(get_request("/api/invoice", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_generate_success() {
    let reply = concat!(
        r#"Here you go: {"client":{"name":"John Doe"},"#,
        r#""items":[{"id":"1","description":"consulting","qty":1,"unitPrice":500}]}"#,
    );
    let app = TestApp::with_reply(Ok(json!({ "text": reply })));

    let (status, body) = app
        .send(generate_request(json!({ "prompt": "Invoice John Doe $500 for consulting" })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["model"], "gemini-2.5-flash");
    assert_eq!(body["data"]["client"]["name"], "John Doe");
    assert_eq!(body["data"]["items"][0]["unitPrice"], 500);
}

#[tokio::test]
async fn test_generate_without_api_key() {
    let app = TestApp::new(DraftGenerator::unconfigured());
    let (status, body) = app
        .send(generate_request(json!({ "prompt": "bill acme" })))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn test_generate_blank_prompt() {
    let app = TestApp::with_reply(Ok(json!({ "text": "{}" })));

    for payload in [json!({ "prompt": "   " }), json!({})] {
        let (status, body) = app
            .send(generate_request(payload))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Prompt text required");
    }
}

#[tokio::test]
async fn test_generate_all_models_failed() {
    let app = TestApp::with_reply(Err(ProviderError::Transport("timeout".into())));
    let (status, body) = app
        .send(generate_request(json!({ "prompt": "bill acme" })))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "AI generation failed");
    assert_eq!(body["detail"], "request failed: timeout");
}

#[tokio::test]
async fn test_generate_no_json_found() {
    let app = TestApp::with_reply(Ok(json!({ "text": "Sorry, I cannot help." })));
    let (status, body) = app
        .send(generate_request(json!({ "prompt": "bill acme" })))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "AI returned malformed response (no JSON found)");
    assert_eq!(body["raw"], "Sorry, I cannot help.");
    assert_eq!(body["model"], "gemini-2.5-flash");
}

#[tokio::test]
async fn test_generate_malformed_json() {
    let app = TestApp::with_reply(Ok(json!({ "text": "{bad json}" })));
    let (status, body) = app
        .send(generate_request(json!({ "prompt": "bill acme" })))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "AI returned invalid JSON");
    assert_eq!(body["raw"], "{bad json}");
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_metrics_count_generations() {
    let app = TestApp::with_reply(Ok(json!({ "text": "{\"notes\":\"ok\"}" })));
    app.send(generate_request(json!({ "prompt": "bill acme" })))
        .await;
    app.send(generate_request(json!({ "prompt": "" })))
        .await;

    let (status, text) = app.send_text(get_request("/metrics", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("invoice_ai_generations_total{outcome=\"success\"} 1"));
    assert!(text.contains("invoice_ai_generations_total{outcome=\"empty_prompt\"} 1"));
}

// =============================================================================
// Invoices
// =============================================================================

#[tokio::test]
async fn test_invoice_crud() {
    let app = TestApp::new(DraftGenerator::unconfigured());

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/invoice",
            Some(ALICE),
            json!({
                "invoiceNumber": "INV-1001",
                "client": { "name": "John Doe" },
                "items": [{ "id": "1", "description": "consulting", "qty": 2, "unitPrice": 250 }],
                "taxPercent": 10,
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["subtotal"], 500.0);
    assert_eq!(body["data"]["total"], 550.0);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.send(get_request("/api/invoice", Some(ALICE))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .send(json_request(
            "PUT",
            &format!("/api/invoice/{id}"),
            Some(ALICE),
            json!({ "status": "paid", "notes": "thanks" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "paid");
    assert_eq!(body["data"]["invoiceNumber"], "INV-1001");

    let (status, _) = app
        .send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/invoice/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {ALICE}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(get_request(&format!("/api/invoice/{id}"), Some(ALICE))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invoices_are_private_to_owner() {
    let app = TestApp::new(DraftGenerator::unconfigured());
    let (_, body) = app
        .send(json_request(
            "POST",
            "/api/invoice",
            Some(ALICE),
            json!({ "invoiceNumber": "INV-1" }),
        ))
        .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.send(get_request(&format!("/api/invoice/{id}"), Some(BOB))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.send(get_request("/api/invoice", Some(BOB))).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invoice_validation_and_conflicts() {
    let app = TestApp::new(DraftGenerator::unconfigured());

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/invoice",
            Some(ALICE),
            json!({ "items": [{ "description": "  ", "qty": 1, "unitPrice": 1 }] }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/invoice")
                .header(header::AUTHORIZATION, format!("Bearer {ALICE}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let payload = json!({ "invoiceNumber": "INV-7" });
    let (status, _) = app
        .send(json_request("POST", "/api/invoice", Some(ALICE), payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app
        .send(json_request("POST", "/api/invoice", Some(ALICE), payload))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

// =============================================================================
// Business profile
// =============================================================================

#[tokio::test]
async fn test_business_profile_lifecycle() {
    let app = TestApp::new(DraftGenerator::unconfigured());

    let (status, _) = app
        .send(get_request("/api/businessProfile/me", Some(ALICE)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(multipart_request(
            "POST",
            "/api/businessProfile",
            ALICE,
            &[
                ("businessName", None, "Acme"),
                ("defaultTaxPercent", None, "12"),
                ("logoName", Some("logo.png"), "fake-png-bytes"),
                ("stampName", Some("empty.png"), ""),
            ],
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["businessName"], "Acme");
    assert_eq!(body["data"]["defaultTaxPercent"], 12.0);
    let logo = body["data"]["logoUrl"].as_str().unwrap().to_string();
    assert!(logo.starts_with("/uploads/business-"));
    assert!(logo.ends_with(".png"));
    assert!(body["data"]["stampUrl"].is_null());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, served) = app.send_text(get_request(&logo, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, "fake-png-bytes");

    let (status, body) = app
        .send(multipart_request(
            "PUT",
            &format!("/api/businessProfile/{id}"),
            ALICE,
            &[("phone", None, "555-0100")],
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone"], "555-0100");
    assert_eq!(body["data"]["businessName"], "Acme");
    assert_eq!(body["data"]["logoUrl"], logo.as_str());

    let (status, _) = app
        .send(multipart_request(
            "PUT",
            &format!("/api/businessProfile/{id}"),
            BOB,
            &[("phone", None, "hijack")],
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/api/businessProfile",
            ALICE,
            &[("businessName", None, "Again")],
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_business_profile_rejects_bad_fields() {
    let app = TestApp::new(DraftGenerator::unconfigured());

    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/api/businessProfile",
            ALICE,
            &[("defaultTaxPercent", None, "lots")],
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(multipart_request(
            "POST",
            "/api/businessProfile",
            ALICE,
            &[
                ("logoName", Some("a.png"), "one"),
                ("logoName", Some("b.png"), "two"),
            ],
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("logoName"));
}

#[tokio::test]
async fn test_rejected_profile_forms_leave_no_files() {
    let app = TestApp::new(DraftGenerator::unconfigured());

    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/api/businessProfile",
            ALICE,
            &[
                ("logoName", Some("a.png"), "one"),
                ("logoName", Some("b.png"), "two"),
            ],
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/api/businessProfile",
            ALICE,
            &[
                ("stampName", Some("stamp.png"), "stamp"),
                ("defaultTaxPercent", None, "lots"),
            ],
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.stored_files(), 0);

    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/api/businessProfile",
            ALICE,
            &[("businessName", None, "Acme"), ("logoName", Some("logo.png"), "logo")],
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.stored_files(), 1);

    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/api/businessProfile",
            ALICE,
            &[("logoName", Some("again.png"), "again")],
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.stored_files(), 1);
}
