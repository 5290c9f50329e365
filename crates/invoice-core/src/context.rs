//! Request Context: identity resolved by the auth layer, carried to handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Owner id every stored record is scoped to
    pub owner: String,
    pub trace_id: String,
}

impl RequestContext {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}
