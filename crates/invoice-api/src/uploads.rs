//! Local upload directory for business-profile images
use std::path::{Path, PathBuf};

use chrono::Utc;
use invoice_core::InvoiceError;
use rand::Rng;
use tracing::{info, warn};

/// URL prefix the upload directory is served under
pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), InvoiceError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| InvoiceError::Upload(format!("cannot create upload directory: {e}")))
    }

    /// Write `bytes` under a generated name and return its public URL.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, InvoiceError> {
        self.ensure_dir().await?;
        let name = stored_name(original_name);
        let path = self.dir.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| InvoiceError::Upload(format!("cannot store upload: {e}")))?;
        info!(file = %name, size = bytes.len(), "Stored upload");
        Ok(format!("{UPLOADS_ROUTE}/{name}"))
    }

    /// Delete a file previously returned by [`UploadStore::save`]. Failures
    /// are logged; URLs outside the upload route are ignored.
    pub async fn remove(&self, url: &str) {
        let Some(name) = url
            .strip_prefix(UPLOADS_ROUTE)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
        else {
            return;
        };
        if let Err(e) = tokio::fs::remove_file(self.dir.join(name)).await {
            warn!(file = %name, error = %e, "Failed to remove upload");
        }
    }
}

/// `business-{unix_millis}-{random}{.ext}`; only a short alphanumeric
/// extension of the client's file name is kept.
fn stored_name(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();
    let unique: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("business-{}-{}{}", Utc::now().timestamp_millis(), unique, ext)
}
