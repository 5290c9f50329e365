//! Response Extractor: first `{` .. last `}` of model text, parsed as JSON
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractError {
    #[error("no JSON object found in model output")]
    NoJsonFound { raw: String },

    #[error("model output is not valid JSON: {message}")]
    MalformedJson { raw: String, message: String },
}

/// Parse the span from the first `{` to the last `}` inclusive.
///
/// This is deliberately not a balanced-brace scan: two objects separated by
/// prose yield one unparseable span. The parsed value is returned as-is and
/// is not checked against the draft template.
pub fn extract_draft(raw: &str) -> Result<Value, ExtractError> {
    let span = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => &raw[start..=end],
        _ => {
            return Err(ExtractError::NoJsonFound {
                raw: raw.to_string(),
            })
        }
    };

    serde_json::from_str(span).map_err(|e| ExtractError::MalformedJson {
        raw: raw.to_string(),
        message: e.to_string(),
    })
}
