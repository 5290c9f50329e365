//! In-memory document store using DashMap
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use invoice_core::{BusinessProfile, Invoice};
use tracing::debug;

use crate::traits::{BusinessProfileRepository, InvoiceRepository, StoreError, StoreResult};

/// In-memory storage for invoices and business profiles
#[derive(Clone, Default)]
pub struct MemoryStore {
    invoices: Arc<DashMap<String, Invoice>>,
    /// (owner, invoice number) -> invoice id
    invoice_numbers: Arc<DashMap<(String, String), String>>,
    profiles: Arc<DashMap<String, BusinessProfile>>,
    /// owner -> profile id
    profile_owners: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn owned_invoice(&self, owner: &str, id: &str) -> StoreResult<Invoice> {
        self.invoices
            .get(id)
            .filter(|inv| inv.owner == owner)
            .map(|inv| inv.value().clone())
            .ok_or_else(|| StoreError::NotFound("Invoice".to_string()))
    }

    fn owned_profile(&self, owner: &str, id: &str) -> StoreResult<BusinessProfile> {
        self.profiles
            .get(id)
            .filter(|p| p.owner == owner)
            .map(|p| p.value().clone())
            .ok_or_else(|| StoreError::NotFound("Business profile".to_string()))
    }
}

fn duplicate_number(number: &str) -> StoreError {
    StoreError::Conflict(format!("Invoice number {number} already exists"))
}

#[async_trait]
impl InvoiceRepository for MemoryStore {
    async fn create(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let key = (invoice.owner.clone(), invoice.invoice_number.clone());
        match self.invoice_numbers.entry(key) {
            Entry::Occupied(_) => return Err(duplicate_number(&invoice.invoice_number)),
            Entry::Vacant(slot) => {
                slot.insert(invoice.id.clone());
            }
        }
        debug!(id = %invoice.id, owner = %invoice.owner, "Stored invoice");
        self.invoices.insert(invoice.id.clone(), invoice.clone());
        Ok(invoice)
    }

    async fn list_for_owner(&self, owner: &str) -> StoreResult<Vec<Invoice>> {
        let mut invoices: Vec<Invoice> = self
            .invoices
            .iter()
            .filter(|inv| inv.owner == owner)
            .map(|inv| inv.value().clone())
            .collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    async fn get(&self, owner: &str, id: &str) -> StoreResult<Invoice> {
        self.owned_invoice(owner, id)
    }

    async fn update(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let existing = self.owned_invoice(&invoice.owner, &invoice.id)?;

        if existing.invoice_number != invoice.invoice_number {
            let key = (invoice.owner.clone(), invoice.invoice_number.clone());
            match self.invoice_numbers.entry(key) {
                Entry::Occupied(_) => return Err(duplicate_number(&invoice.invoice_number)),
                Entry::Vacant(slot) => {
                    slot.insert(invoice.id.clone());
                }
            }
            self.invoice_numbers
                .remove(&(existing.owner.clone(), existing.invoice_number.clone()));
        }

        self.invoices.insert(invoice.id.clone(), invoice.clone());
        Ok(invoice)
    }

    async fn delete(&self, owner: &str, id: &str) -> StoreResult<()> {
        let existing = self.owned_invoice(owner, id)?;
        self.invoices.remove(id);
        self.invoice_numbers
            .remove(&(existing.owner, existing.invoice_number));
        debug!(id, owner, "Deleted invoice");
        Ok(())
    }
}

#[async_trait]
impl BusinessProfileRepository for MemoryStore {
    async fn create_profile(&self, profile: BusinessProfile) -> StoreResult<BusinessProfile> {
        match self.profile_owners.entry(profile.owner.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Conflict(
                    "Business profile already exists".to_string(),
                ))
            }
            Entry::Vacant(slot) => {
                slot.insert(profile.id.clone());
            }
        }
        self.profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn profile_for_owner(&self, owner: &str) -> StoreResult<BusinessProfile> {
        let id = self
            .profile_owners
            .get(owner)
            .map(|id| id.value().clone())
            .ok_or_else(|| StoreError::NotFound("Business profile".to_string()))?;
        self.owned_profile(owner, &id)
    }

    async fn get_profile(&self, owner: &str, id: &str) -> StoreResult<BusinessProfile> {
        self.owned_profile(owner, id)
    }

    async fn update_profile(&self, profile: BusinessProfile) -> StoreResult<BusinessProfile> {
        self.owned_profile(&profile.owner, &profile.id)?;
        self.profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }
}
