//! Server configuration read from the process environment
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use invoice_draft::{DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL_CANDIDATES};
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;

#[derive(Clone)]
pub struct ServerConfig {
    pub addr: String,
    /// `None` keeps the server up; AI drafting then reports the missing key
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    /// Tried in order
    pub model_candidates: Vec<String>,
    pub request_timeout_ms: u64,
    pub cors_origin: String,
    pub upload_dir: PathBuf,
    pub body_limit_bytes: usize,
    /// bearer token -> user id
    pub api_tokens: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            gemini_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model_candidates: DEFAULT_MODEL_CANDIDATES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            api_tokens: HashMap::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset; malformed
    /// numbers fall back to defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port: u16 = parse_or(get("PORT"), "PORT", DEFAULT_PORT);
        let addr = get("INVOICE_ADDR").unwrap_or_else(|| format!("0.0.0.0:{port}"));

        let model_candidates = get("INVOICE_AI_MODELS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|models| !models.is_empty())
            .unwrap_or(defaults.model_candidates);

        Self {
            addr,
            gemini_api_key: get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY")),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            model_candidates,
            request_timeout_ms: parse_or(
                get("REQUEST_TIMEOUT_MS"),
                "REQUEST_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            ),
            cors_origin: get("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            upload_dir: get("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            body_limit_bytes: parse_or(
                get("BODY_LIMIT_BYTES"),
                "BODY_LIMIT_BYTES",
                DEFAULT_BODY_LIMIT_BYTES,
            ),
            api_tokens: get("INVOICE_API_TOKENS")
                .map(|v| parse_tokens(&v))
                .unwrap_or_default(),
        }
    }

    /// Log the effective settings without secrets.
    pub fn log_summary(&self) {
        info!(
            addr = %self.addr,
            models = %self.model_candidates.join(","),
            gemini_base_url = %self.gemini_base_url,
            api_key_configured = self.gemini_api_key.is_some(),
            cors_origin = %self.cors_origin,
            upload_dir = %self.upload_dir.display(),
            body_limit_bytes = self.body_limit_bytes,
            api_tokens = self.api_tokens.len(),
            "Server configuration loaded"
        );
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> T {
    match value {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Invalid value; using default");
            default
        }),
    }
}

/// `token=user_id` pairs separated by commas
fn parse_tokens(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| match pair.split_once('=') {
            Some((token, user)) if !token.trim().is_empty() && !user.trim().is_empty() => {
                Some((token.trim().to_string(), user.trim().to_string()))
            }
            _ => {
                warn!("Ignoring malformed INVOICE_API_TOKENS entry");
                None
            }
        })
        .collect()
}
