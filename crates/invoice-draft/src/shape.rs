//! Response-shape adapter: provider response -> plain text
//!
//! Providers have returned text under several different keys over time.
//! Each known shape is one pure extractor; they are tried in order and the
//! first non-empty result wins. New shapes go into [`EXTRACTORS`] only.
use serde_json::Value;
use tracing::trace;

type ShapeExtractor = fn(&Value) -> Option<String>;

/// Ordered by preference. `serialized` must stay last.
const EXTRACTORS: &[(&str, ShapeExtractor)] = &[
    ("text", top_level_text),
    ("output[0].content[0].text", output_content_text),
    ("outputs[0]", first_outputs_text),
    ("outputs[*]", joined_outputs_text),
    ("raw", serialized),
];

/// Text carried by `response`, or an empty string when nothing usable exists.
pub fn response_text(response: &Value) -> String {
    for (shape, extract) in EXTRACTORS {
        if let Some(text) = extract(response).filter(|s| !s.is_empty()) {
            trace!(target: "invoice_draft", shape = *shape, "response text extracted");
            return text;
        }
    }
    String::new()
}

fn as_string(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str).map(str::to_string)
}

fn top_level_text(v: &Value) -> Option<String> {
    as_string(v.get("text"))
}

fn output_content_text(v: &Value) -> Option<String> {
    as_string(v.get("output")?.get(0)?.get("content")?.get(0)?.get("text"))
}

fn first_outputs_text(v: &Value) -> Option<String> {
    let first = v.get("outputs")?.get(0)?;
    as_string(first.get("text"))
        .filter(|s| !s.is_empty())
        .or_else(|| as_string(first.get("content")))
}

fn joined_outputs_text(v: &Value) -> Option<String> {
    let outputs = v.get("outputs")?.as_array()?;
    let joined = outputs
        .iter()
        .map(output_piece)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    Some(joined)
}

fn output_piece(o: &Value) -> String {
    match o {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(text) = map.get("text").and_then(Value::as_str) {
                return text.to_string();
            }
            if let Some(parts) = map.get("content").and_then(Value::as_array) {
                return parts
                    .iter()
                    .map(|c| c.get("text").and_then(Value::as_str).unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join("\n");
            }
            o.to_string()
        }
        other => other.to_string(),
    }
}

fn serialized(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
