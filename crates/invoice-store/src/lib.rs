//! Invoice Store: repository traits and the in-memory document store
//!
//! Every operation is scoped to an owner id. A record that exists but
//! belongs to someone else is reported as [`StoreError::NotFound`].

mod memory_store;
mod traits;

pub use memory_store::MemoryStore;
pub use traits::{BusinessProfileRepository, InvoiceRepository, StoreError, StoreResult};
