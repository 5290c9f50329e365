//! API Handlers
pub mod ai;
pub mod business_profile;
pub mod health;
pub mod invoices;

use axum::extract::rejection::JsonRejection;

use crate::error::ApiError;

pub(crate) fn bad_json(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}
