//! Draft Generator: prompt -> invoke -> extract, folded into one outcome
use std::sync::Arc;

use tracing::{error, info};

use crate::extract::{extract_draft, ExtractError};
use crate::invoker::{invoke, Invocation};
use crate::model::GenerativeModel;
use crate::outcome::GenerationOutcome;
use crate::prompt::build_prompt;

/// Newer models first; later entries cover availability and quota gaps.
pub const DEFAULT_MODEL_CANDIDATES: &[&str] =
    &["gemini-2.5-flash", "gemini-2.0-flash", "gemini-2.0"];

#[derive(Clone)]
pub struct DraftGenerator {
    /// `None` when no API credential is configured
    model: Option<Arc<dyn GenerativeModel>>,
    candidates: Vec<String>,
}

impl DraftGenerator {
    pub fn new(model: Option<Arc<dyn GenerativeModel>>, candidates: Vec<String>) -> Self {
        Self { model, candidates }
    }

    pub fn with_default_candidates(model: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self::new(
            model,
            DEFAULT_MODEL_CANDIDATES.iter().map(|m| m.to_string()).collect(),
        )
    }

    /// Generator that always reports a missing credential
    pub fn unconfigured() -> Self {
        Self::with_default_candidates(None)
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Turn free text into an unvalidated invoice draft.
    ///
    /// A candidate whose text cannot be parsed ends the request; remaining
    /// candidates are not retried.
    pub async fn generate_draft(&self, prompt_text: &str) -> GenerationOutcome {
        let Some(client) = &self.model else {
            error!(target: "invoice_draft", "No model API key configured");
            return GenerationOutcome::no_api_key();
        };
        if prompt_text.trim().is_empty() {
            return GenerationOutcome::empty_prompt();
        }

        let prompt = build_prompt(prompt_text);

        let (model, text, attempts) =
            match invoke(client.as_ref(), &prompt, &self.candidates).await {
                Invocation::Generated {
                    model,
                    text,
                    attempts,
                } => (model, text, attempts),
                Invocation::Exhausted {
                    last_error,
                    attempts,
                } => {
                    error!(
                        target: "invoice_draft",
                        error = %last_error,
                        tried = attempts.len(),
                        "AI generation failed (no text)"
                    );
                    return GenerationOutcome::all_models_failed(last_error, attempts);
                }
            };

        match extract_draft(&text) {
            Ok(data) => {
                info!(target: "invoice_draft", model = %model, "Invoice draft generated");
                GenerationOutcome::success(model, data, text, attempts)
            }
            Err(ExtractError::NoJsonFound { raw }) => {
                error!(
                    target: "invoice_draft",
                    model = %model,
                    raw = %raw,
                    "AI response did not contain a JSON object"
                );
                GenerationOutcome::no_json_found(model, raw, attempts)
            }
            Err(ExtractError::MalformedJson { raw, message }) => {
                error!(
                    target: "invoice_draft",
                    model = %model,
                    error = %message,
                    "Failed to parse JSON from AI response"
                );
                GenerationOutcome::malformed_json(model, raw, message, attempts)
            }
        }
    }
}
