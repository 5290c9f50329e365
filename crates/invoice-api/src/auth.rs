//! Session verification seam
use std::collections::HashMap;

use async_trait::async_trait;
use invoice_core::InvoiceError;

/// Resolves a bearer token to the user id that owns the caller's records.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, InvoiceError>;
}

/// Fixed token table, loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl SessionVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<String, InvoiceError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| InvoiceError::Auth("Invalid or expired session".to_string()))
    }
}
