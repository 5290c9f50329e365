//! Invoice Core: records, totals, and the shared error model
//!
//! Everything here is plain data. Persistence lives in `invoice-store`,
//! HTTP in `invoice-api`, and AI drafting in `invoice-draft`.

pub mod context;
pub mod data_model;
pub mod error;

pub use context::RequestContext;
pub use data_model::{
    placeholder_invoice_number, today_iso, BusinessProfile, BusinessProfileInput, ClientInfo,
    Invoice, InvoiceInput, InvoiceStatus, LineItem, Totals, DEFAULT_CURRENCY, DEFAULT_TAX_PERCENT,
};
pub use error::InvoiceError;

/// Crate version reported by the health endpoint
pub const INVOICE_VERSION: &str = env!("CARGO_PKG_VERSION");
