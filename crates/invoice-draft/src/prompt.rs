//! Prompt Builder: user text + draft template -> one instruction string
use invoice_core::{placeholder_invoice_number, today_iso, ClientInfo, DEFAULT_TAX_PERCENT};
use serde::Serialize;

/// Example draft shown to the model. It only seeds the prompt; nothing
/// downstream checks the model's answer against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftTemplate {
    pub invoice_number: String,
    pub issue_date: String,
    pub due_date: String,
    pub from_business_name: String,
    pub from_email: String,
    pub from_address: String,
    pub from_phone: String,
    pub client: ClientInfo,
    pub items: Vec<TemplateItem>,
    /// Whole percent, so the example reads `18` rather than `18.0`
    pub tax_percent: u32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItem {
    pub id: String,
    pub description: String,
    pub qty: u32,
    pub unit_price: u32,
}

impl DraftTemplate {
    /// Template with a fresh placeholder number and today's issue date
    pub fn fresh() -> Self {
        Self::dated(placeholder_invoice_number(), today_iso())
    }

    pub fn dated(invoice_number: String, issue_date: String) -> Self {
        Self {
            invoice_number,
            issue_date,
            due_date: String::new(),
            from_business_name: String::new(),
            from_email: String::new(),
            from_address: String::new(),
            from_phone: String::new(),
            client: ClientInfo::default(),
            items: vec![TemplateItem {
                id: "1".to_string(),
                description: String::new(),
                qty: 1,
                unit_price: 0,
            }],
            tax_percent: DEFAULT_TAX_PERCENT as u32,
            notes: String::new(),
        }
    }

    fn to_pretty_json(&self) -> String {
        // Plain structs of strings and finite numbers always serialize.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Build the generation prompt around a freshly seeded template.
pub fn build_prompt(user_text: &str) -> String {
    build_prompt_for(user_text, &DraftTemplate::fresh())
}

/// Build the generation prompt around an explicit template.
pub fn build_prompt_for(user_text: &str, template: &DraftTemplate) -> String {
    format!(
        r#"
You are an invoice generation assistant.

Task:
  - Analyze the user's input text and produce a valid JSON object only (no explanatory text).
  - The JSON MUST match the schema below (include all fields even if empty).
  - Ensure all dates are ISO 'YYYY-MM-DD' strings and numeric fields are numbers.

Schema:
{schema}

User input:
{user_text}

Output: valid JSON only (no surrounding code fences, no commentary).
"#,
        schema = template.to_pretty_json(),
    )
}
