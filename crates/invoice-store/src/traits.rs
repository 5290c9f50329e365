//! Repository traits for pluggable storage implementations
use async_trait::async_trait;
use invoice_core::{BusinessProfile, Invoice};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Fails with `Conflict` when the owner already has this invoice number.
    async fn create(&self, invoice: Invoice) -> StoreResult<Invoice>;

    /// Newest first
    async fn list_for_owner(&self, owner: &str) -> StoreResult<Vec<Invoice>>;

    async fn get(&self, owner: &str, id: &str) -> StoreResult<Invoice>;

    /// Replace a stored invoice; `invoice.id` and `invoice.owner` select it.
    async fn update(&self, invoice: Invoice) -> StoreResult<Invoice>;

    async fn delete(&self, owner: &str, id: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait BusinessProfileRepository: Send + Sync {
    /// Fails with `Conflict` when the owner already has a profile.
    async fn create_profile(&self, profile: BusinessProfile) -> StoreResult<BusinessProfile>;

    async fn profile_for_owner(&self, owner: &str) -> StoreResult<BusinessProfile>;

    async fn get_profile(&self, owner: &str, id: &str) -> StoreResult<BusinessProfile>;

    async fn update_profile(&self, profile: BusinessProfile) -> StoreResult<BusinessProfile>;
}
