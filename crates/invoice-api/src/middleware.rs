//! CORS and authentication layers
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use invoice_core::RequestContext;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Credentialed CORS for a single front-end origin.
pub fn cors(origin: &str) -> CorsLayer {
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        Err(_) => {
            warn!(origin, "Invalid CORS origin; allowing any origin without credentials");
            CorsLayer::permissive()
        }
    }
}

/// Resolve `Authorization: Bearer <token>` and attach a [`RequestContext`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?
        .to_string();

    let ctx = RequestContext::new(state.verifier.verify(&token).await?);
    debug!(
        owner = %ctx.owner,
        trace_id = %ctx.trace_id,
        path = %req.uri().path(),
        "Authenticated request"
    );
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}
