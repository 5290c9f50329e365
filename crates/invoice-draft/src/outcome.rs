//! Generation Outcome: the single structured result of one draft request
use serde::Serialize;
use serde_json::Value;

use crate::invoker::GenerationAttempt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    NoApiKey,
    EmptyPrompt,
    AllModelsFailed,
    NoJsonFound,
    MalformedJson,
}

impl FailureKind {
    /// Stable snake_case label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoApiKey => "no_api_key",
            Self::EmptyPrompt => "empty_prompt",
            Self::AllModelsFailed => "all_models_failed",
            Self::NoJsonFound => "no_json_found",
            Self::MalformedJson => "malformed_json",
        }
    }
}

/// Built only through the constructors below, which keep `data` present
/// exactly when the outcome succeeded, and `model_used` present whenever a
/// candidate produced text (even text that later failed extraction).
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    model_used: Option<String>,
    data: Option<Value>,
    failure: Option<FailureKind>,
    raw_text: Option<String>,
    detail: Option<String>,
    attempts: Vec<GenerationAttempt>,
}

impl GenerationOutcome {
    pub(crate) fn success(
        model: String,
        data: Value,
        raw_text: String,
        attempts: Vec<GenerationAttempt>,
    ) -> Self {
        Self {
            model_used: Some(model),
            data: Some(data),
            failure: None,
            raw_text: Some(raw_text),
            detail: None,
            attempts,
        }
    }

    pub(crate) fn no_api_key() -> Self {
        Self::failed(FailureKind::NoApiKey, None, None, None, Vec::new())
    }

    pub(crate) fn empty_prompt() -> Self {
        Self::failed(FailureKind::EmptyPrompt, None, None, None, Vec::new())
    }

    pub(crate) fn all_models_failed(last_error: String, attempts: Vec<GenerationAttempt>) -> Self {
        Self::failed(
            FailureKind::AllModelsFailed,
            None,
            None,
            Some(last_error),
            attempts,
        )
    }

    pub(crate) fn no_json_found(
        model: String,
        raw_text: String,
        attempts: Vec<GenerationAttempt>,
    ) -> Self {
        Self::failed(
            FailureKind::NoJsonFound,
            Some(model),
            Some(raw_text),
            None,
            attempts,
        )
    }

    pub(crate) fn malformed_json(
        model: String,
        raw_text: String,
        parse_error: String,
        attempts: Vec<GenerationAttempt>,
    ) -> Self {
        Self::failed(
            FailureKind::MalformedJson,
            Some(model),
            Some(raw_text),
            Some(parse_error),
            attempts,
        )
    }

    fn failed(
        kind: FailureKind,
        model_used: Option<String>,
        raw_text: Option<String>,
        detail: Option<String>,
        attempts: Vec<GenerationAttempt>,
    ) -> Self {
        Self {
            model_used,
            data: None,
            failure: Some(kind),
            raw_text,
            detail,
            attempts,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn model_used(&self) -> Option<&str> {
        self.model_used.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<Value> {
        self.data
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    /// Model text kept for diagnostics
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    /// Last provider error or parser error, when one exists
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn attempts(&self) -> &[GenerationAttempt] {
        &self.attempts
    }

    /// `success` or the failure label
    pub fn label(&self) -> &'static str {
        self.failure.map(|k| k.as_str()).unwrap_or("success")
    }
}
