//! Application state shared across handlers
use std::sync::Arc;

use invoice_draft::{DraftGenerator, GeminiClient, GeminiConfig};
use invoice_store::{BusinessProfileRepository, InvoiceRepository, MemoryStore};
use tracing::warn;

use crate::auth::{SessionVerifier, StaticTokenVerifier};
use crate::config::ServerConfig;
use crate::metrics::Metrics;
use crate::uploads::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub generator: DraftGenerator,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub profiles: Arc<dyn BusinessProfileRepository>,
    pub verifier: Arc<dyn SessionVerifier>,
    pub uploads: UploadStore,
    pub metrics: Metrics,
}

impl AppState {
    /// State backed by a fresh in-memory store.
    pub fn in_memory(
        generator: DraftGenerator,
        verifier: Arc<dyn SessionVerifier>,
        uploads: UploadStore,
    ) -> Result<Self, prometheus::Error> {
        let store = MemoryStore::new();
        Ok(Self {
            generator,
            invoices: Arc::new(store.clone()),
            profiles: Arc::new(store),
            verifier,
            uploads,
            metrics: Metrics::new()?,
        })
    }

    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let generator = match &config.gemini_api_key {
            Some(key) => {
                let client = GeminiClient::new(GeminiConfig {
                    api_key: key.clone(),
                    base_url: config.gemini_base_url.clone(),
                    request_timeout_ms: config.request_timeout_ms,
                })?;
                DraftGenerator::new(Some(Arc::new(client)), config.model_candidates.clone())
            }
            None => {
                warn!("No Gemini API key found. Set GEMINI_API_KEY or GOOGLE_API_KEY in your .env");
                DraftGenerator::new(None, config.model_candidates.clone())
            }
        };

        let verifier = StaticTokenVerifier::new(config.api_tokens.clone());
        if verifier.is_empty() {
            warn!("INVOICE_API_TOKENS is empty; every authenticated route will answer 401");
        }

        Ok(Self::in_memory(
            generator,
            Arc::new(verifier),
            UploadStore::new(config.upload_dir.clone()),
        )?)
    }
}
