//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvoiceError {
    #[error("VALIDATION/{0}")]
    Validation(String),

    #[error("AUTH/{0}")]
    Auth(String),

    #[error("UPLOAD/{0}")]
    Upload(String),
}

impl InvoiceError {
    /// Message without the category prefix, for response bodies
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::Auth(m) | Self::Upload(m) => m,
        }
    }
}
