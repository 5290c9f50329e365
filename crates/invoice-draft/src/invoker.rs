//! Model Invoker: ordered candidate fallback until one yields text
use tracing::{debug, warn};

use crate::model::{GenerativeModel, ProviderError};
use crate::shape::response_text;

/// Reported when no candidate produced an error message to carry
pub const ALL_MODELS_FAILED: &str =
    "All candidate models failed. Check API key, network, or model availability.";

/// One candidate tried within one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationAttempt {
    pub model: String,
    pub succeeded: bool,
    pub text: Option<String>,
    pub error: Option<String>,
}

impl GenerationAttempt {
    fn succeeded(model: &str, text: &str) -> Self {
        Self {
            model: model.to_string(),
            succeeded: true,
            text: Some(text.to_string()),
            error: None,
        }
    }

    fn failed(model: &str, error: &ProviderError) -> Self {
        Self {
            model: model.to_string(),
            succeeded: false,
            text: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// A candidate returned non-empty text; later candidates were not tried.
    Generated {
        model: String,
        text: String,
        attempts: Vec<GenerationAttempt>,
    },
    /// Every candidate failed. Only the most recent error is kept.
    Exhausted {
        last_error: String,
        attempts: Vec<GenerationAttempt>,
    },
}

impl Invocation {
    pub fn attempts(&self) -> &[GenerationAttempt] {
        match self {
            Self::Generated { attempts, .. } | Self::Exhausted { attempts, .. } => attempts,
        }
    }
}

/// Try `candidates` in order, each at most once, awaiting each before the next.
///
/// Provider errors and empty responses are logged and skipped. The first
/// candidate whose normalized response has non-blank text ends the loop;
/// the returned text is trimmed.
pub async fn invoke<S: AsRef<str>>(
    client: &dyn GenerativeModel,
    prompt: &str,
    candidates: &[S],
) -> Invocation {
    let mut attempts = Vec::with_capacity(candidates.len());
    let mut last_error: Option<String> = None;

    for candidate in candidates {
        let model = candidate.as_ref();
        debug!(target: "invoice_draft", model, "Trying model candidate");

        let result = client.generate(model, prompt).await.and_then(|response| {
            let text = response_text(&response);
            let text = text.trim();
            if text.is_empty() {
                Err(ProviderError::EmptyText)
            } else {
                Ok(text.to_string())
            }
        });

        match result {
            Ok(text) => {
                attempts.push(GenerationAttempt::succeeded(model, &text));
                return Invocation::Generated {
                    model: model.to_string(),
                    text,
                    attempts,
                };
            }
            Err(e) => {
                warn!(target: "invoice_draft", model, error = %e, "Model candidate failed");
                attempts.push(GenerationAttempt::failed(model, &e));
                last_error = Some(e.to_string());
            }
        }
    }

    Invocation::Exhausted {
        last_error: last_error.unwrap_or_else(|| ALL_MODELS_FAILED.to_string()),
        attempts,
    }
}
