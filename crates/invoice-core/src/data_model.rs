//! Data Model: Invoice, BusinessProfile, line items and totals
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InvoiceError;

/// Default tax rate applied when the caller does not send one
pub const DEFAULT_TAX_PERCENT: f64 = 18.0;

/// Default invoice currency
pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Client-side identifier, kept as sent
    pub id: String,
    pub description: String,
    #[serde(default = "default_qty")]
    pub qty: f64,
    #[serde(default)]
    pub unit_price: f64,
}

fn default_qty() -> f64 {
    1.0
}

impl LineItem {
    /// Line amount; negative quantities or prices count as zero.
    pub fn amount(&self) -> f64 {
        self.qty.max(0.0) * self.unit_price.max(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Unpaid,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl Totals {
    pub fn compute(items: &[LineItem], tax_percent: f64) -> Self {
        let subtotal: f64 = items.iter().map(LineItem::amount).sum();
        let tax = subtotal * tax_percent.max(0.0) / 100.0;
        Self {
            subtotal: round2(subtotal),
            tax: round2(tax),
            total: round2(subtotal + tax),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Today's date as `YYYY-MM-DD` (UTC)
pub fn today_iso() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Placeholder invoice number of the form `INV-NNNN`, NNNN in 1000..=9999
pub fn placeholder_invoice_number() -> String {
    let n: u16 = rand::rng().random_range(1000..=9999);
    format!("INV-{n}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    /// Authenticated user id that owns the record
    pub owner: String,
    pub invoice_number: String,
    pub issue_date: String,
    pub due_date: String,

    pub from_business_name: String,
    pub from_email: String,
    pub from_address: String,
    pub from_phone: String,
    pub from_gst: String,

    pub client: ClientInfo,
    pub items: Vec<LineItem>,

    pub currency: String,
    pub status: InvoiceStatus,

    pub logo_data_url: Option<String>,
    pub stamp_data_url: Option<String>,
    pub signature_data_url: Option<String>,
    pub signature_name: String,
    pub signature_title: String,

    pub notes: String,
    pub tax_percent: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload. Every field is optional: on create, missing
/// fields take their defaults; on update, only present fields change.
/// Totals are never read from the payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    pub invoice_number: Option<String>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub from_business_name: Option<String>,
    pub from_email: Option<String>,
    pub from_address: Option<String>,
    pub from_phone: Option<String>,
    pub from_gst: Option<String>,
    pub client: Option<ClientInfo>,
    pub items: Option<Vec<LineItem>>,
    pub currency: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub logo_data_url: Option<String>,
    pub stamp_data_url: Option<String>,
    pub signature_data_url: Option<String>,
    pub signature_name: Option<String>,
    pub signature_title: Option<String>,
    pub notes: Option<String>,
    pub tax_percent: Option<f64>,
}

impl Invoice {
    /// Build a new invoice for `owner` from a create payload.
    pub fn from_input(owner: &str, input: InvoiceInput) -> Result<Self, InvoiceError> {
        let now = Utc::now();
        let mut invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            invoice_number: placeholder_invoice_number(),
            issue_date: today_iso(),
            due_date: String::new(),
            from_business_name: String::new(),
            from_email: String::new(),
            from_address: String::new(),
            from_phone: String::new(),
            from_gst: String::new(),
            client: ClientInfo::default(),
            items: Vec::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            status: InvoiceStatus::default(),
            logo_data_url: None,
            stamp_data_url: None,
            signature_data_url: None,
            signature_name: String::new(),
            signature_title: String::new(),
            notes: String::new(),
            tax_percent: DEFAULT_TAX_PERCENT,
            subtotal: 0.0,
            tax: 0.0,
            total: 0.0,
            created_at: now,
            updated_at: now,
        };
        invoice.apply(input)?;
        Ok(invoice)
    }

    /// Merge the present fields of `input` into this invoice and recompute totals.
    pub fn apply(&mut self, input: InvoiceInput) -> Result<(), InvoiceError> {
        if let Some(items) = &input.items {
            validate_items(items)?;
        }

        if let Some(v) = input.invoice_number.filter(|s| !s.trim().is_empty()) {
            self.invoice_number = v.trim().to_string();
        }
        if let Some(v) = input.issue_date.filter(|s| !s.trim().is_empty()) {
            self.issue_date = v;
        }
        set(&mut self.due_date, input.due_date);
        set(&mut self.from_business_name, input.from_business_name);
        set(&mut self.from_email, input.from_email);
        set(&mut self.from_address, input.from_address);
        set(&mut self.from_phone, input.from_phone);
        set(&mut self.from_gst, input.from_gst);
        set(&mut self.client, input.client);
        set(&mut self.items, input.items);
        set(&mut self.currency, input.currency);
        set(&mut self.status, input.status);
        if input.logo_data_url.is_some() {
            self.logo_data_url = input.logo_data_url;
        }
        if input.stamp_data_url.is_some() {
            self.stamp_data_url = input.stamp_data_url;
        }
        if input.signature_data_url.is_some() {
            self.signature_data_url = input.signature_data_url;
        }
        set(&mut self.signature_name, input.signature_name);
        set(&mut self.signature_title, input.signature_title);
        set(&mut self.notes, input.notes);
        set(&mut self.tax_percent, input.tax_percent);

        let totals = Totals::compute(&self.items, self.tax_percent);
        self.subtotal = totals.subtotal;
        self.tax = totals.tax;
        self.total = totals.total;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *field = v;
    }
}

fn validate_items(items: &[LineItem]) -> Result<(), InvoiceError> {
    for (idx, item) in items.iter().enumerate() {
        if item.description.trim().is_empty() {
            return Err(InvoiceError::Validation(format!(
                "item {} is missing a description",
                idx + 1
            )));
        }
        if !item.qty.is_finite() || !item.unit_price.is_finite() {
            return Err(InvoiceError::Validation(format!(
                "item {} has a non-numeric quantity or price",
                idx + 1
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub id: String,
    pub owner: String,
    pub business_name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub gst: String,
    pub logo_url: Option<String>,
    pub stamp_url: Option<String>,
    pub signature_url: Option<String>,
    pub signature_owner_name: String,
    pub signature_owner_title: String,
    pub default_tax_percent: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Text fields and stored upload URLs collected from a multipart form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessProfileInput {
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub gst: Option<String>,
    pub logo_url: Option<String>,
    pub stamp_url: Option<String>,
    pub signature_url: Option<String>,
    pub signature_owner_name: Option<String>,
    pub signature_owner_title: Option<String>,
    pub default_tax_percent: Option<f64>,
}

impl BusinessProfile {
    pub fn from_input(owner: &str, input: BusinessProfileInput) -> Self {
        let now = Utc::now();
        let mut profile = BusinessProfile {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            business_name: String::new(),
            email: String::new(),
            address: String::new(),
            phone: String::new(),
            gst: String::new(),
            logo_url: None,
            stamp_url: None,
            signature_url: None,
            signature_owner_name: String::new(),
            signature_owner_title: String::new(),
            default_tax_percent: DEFAULT_TAX_PERCENT,
            created_at: now,
            updated_at: now,
        };
        profile.apply(input);
        profile
    }

    pub fn apply(&mut self, input: BusinessProfileInput) {
        set(&mut self.business_name, input.business_name);
        set(&mut self.email, input.email);
        set(&mut self.address, input.address);
        set(&mut self.phone, input.phone);
        set(&mut self.gst, input.gst);
        if input.logo_url.is_some() {
            self.logo_url = input.logo_url;
        }
        if input.stamp_url.is_some() {
            self.stamp_url = input.stamp_url;
        }
        if input.signature_url.is_some() {
            self.signature_url = input.signature_url;
        }
        set(&mut self.signature_owner_name, input.signature_owner_name);
        set(&mut self.signature_owner_title, input.signature_owner_title);
        set(&mut self.default_tax_percent, input.default_tax_percent);
        self.updated_at = Utc::now();
    }
}
