//! Invoice API: REST endpoints for invoices, business profiles, and AI drafts
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod state;
pub mod uploads;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

pub use config::ServerConfig;
pub use state::AppState;

pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    let protected = Router::new()
        .route(
            "/api/invoice",
            get(handlers::invoices::list).post(handlers::invoices::create),
        )
        .route(
            "/api/invoice/{id}",
            get(handlers::invoices::get_one)
                .put(handlers::invoices::update)
                .delete(handlers::invoices::delete),
        )
        .route("/api/businessProfile", post(handlers::business_profile::create))
        .route("/api/businessProfile/me", get(handlers::business_profile::my_profile))
        .route("/api/businessProfile/{id}", put(handlers::business_profile::update))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .route("/", get(handlers::health::banner))
        .route("/health", get(handlers::health::health))
        .route("/metrics", get(handlers::health::metrics))
        .route("/api/ai/generate", post(handlers::ai::generate))
        .merge(protected)
        .nest_service(uploads::UPLOADS_ROUTE, ServeDir::new(state.uploads.dir()))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(middleware::cors(&config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    state.uploads.ensure_dir().await?;
    let app = create_app(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!("Invoice API listening on {}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}
