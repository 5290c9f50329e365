//! Model seam: the one outbound capability the drafting core consumes
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// "Generate content from a named model given a prompt."
///
/// Implementations return the provider's response body as-is; its shape
/// varies by provider and version and is normalized by [`crate::shape`].
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<Value, ProviderError>;
}

/// Failure of a single candidate. Recovered by falling back to the next
/// candidate and never surfaced on its own.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("Empty text returned from model")]
    EmptyText,
}
