//! `/api/businessProfile`: multipart create/update with image uploads
use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use invoice_core::{BusinessProfile, BusinessProfileInput, RequestContext};
use invoice_store::StoreError;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const LOGO_FIELD: &str = "logoName";
const STAMP_FIELD: &str = "stampName";
const SIGNATURE_FIELD: &str = "signatureNameMeta";

pub async fn my_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Value>> {
    let profile = state.profiles.profile_for_owner(&ctx.owner).await?;
    Ok(Json(json!({ "success": true, "data": profile })))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let form = ProfileForm::read(multipart).await?;
    match state.profiles.profile_for_owner(&ctx.owner).await {
        Ok(_) => {
            return Err(ApiError::Conflict(
                "Business profile already exists".to_string(),
            ))
        }
        Err(StoreError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let (input, saved) = form.store(&state).await?;
    let profile = BusinessProfile::from_input(&ctx.owner, input);
    let profile = match state.profiles.create_profile(profile).await {
        Ok(profile) => profile,
        Err(e) => {
            discard(&state, &saved).await;
            return Err(e.into());
        }
    };
    info!(id = %profile.id, "Business profile created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Business profile created", "data": profile })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let mut profile = state.profiles.get_profile(&ctx.owner, &id).await?;
    let form = ProfileForm::read(multipart).await?;

    let (input, saved) = form.store(&state).await?;
    profile.apply(input);
    let profile = match state.profiles.update_profile(profile).await {
        Ok(profile) => profile,
        Err(e) => {
            discard(&state, &saved).await;
            return Err(e.into());
        }
    };
    Ok(Json(json!({ "success": true, "message": "Business profile updated", "data": profile })))
}

async fn discard(state: &AppState, saved: &[String]) {
    for url in saved {
        state.uploads.remove(url).await;
    }
}

/// Image held in memory until the form has been fully validated.
#[derive(Debug)]
struct PendingFile {
    file_name: String,
    bytes: Bytes,
}

/// A fully read multipart form. Nothing touches the upload directory until
/// [`ProfileForm::store`].
#[derive(Debug, Default)]
struct ProfileForm {
    input: BusinessProfileInput,
    logo: Option<PendingFile>,
    stamp: Option<PendingFile>,
    signature: Option<PendingFile>,
}

impl ProfileForm {
    /// Collect text fields and at most one non-empty file per image field.
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(slot) = form.file_slot(&name) {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                if bytes.is_empty() {
                    continue;
                }
                if slot.is_some() {
                    return Err(ApiError::BadRequest(format!(
                        "Only one file is allowed for {name}"
                    )));
                }
                *slot = Some(PendingFile { file_name, bytes });
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            apply_text_field(&mut form.input, &name, value)?;
        }

        Ok(form)
    }

    fn file_slot(&mut self, field: &str) -> Option<&mut Option<PendingFile>> {
        match field {
            LOGO_FIELD => Some(&mut self.logo),
            STAMP_FIELD => Some(&mut self.stamp),
            SIGNATURE_FIELD => Some(&mut self.signature),
            _ => None,
        }
    }

    /// Write pending files and return the input with their URLs filled in,
    /// plus every URL written. A failed write removes the earlier ones.
    async fn store(self, state: &AppState) -> ApiResult<(BusinessProfileInput, Vec<String>)> {
        let Self {
            mut input,
            logo,
            stamp,
            signature,
        } = self;
        let mut saved = Vec::new();

        let targets = [
            (logo, &mut input.logo_url),
            (stamp, &mut input.stamp_url),
            (signature, &mut input.signature_url),
        ];
        for (file, url) in targets {
            let Some(file) = file else { continue };
            match state.uploads.save(&file.file_name, &file.bytes).await {
                Ok(stored) => {
                    saved.push(stored.clone());
                    *url = Some(stored);
                }
                Err(e) => {
                    discard(state, &saved).await;
                    return Err(e.into());
                }
            }
        }

        Ok((input, saved))
    }
}

fn apply_text_field(input: &mut BusinessProfileInput, field: &str, value: String) -> ApiResult<()> {
    match field {
        "businessName" => input.business_name = Some(value),
        "email" => input.email = Some(value),
        "address" => input.address = Some(value),
        "phone" => input.phone = Some(value),
        "gst" => input.gst = Some(value),
        "signatureOwnerName" => input.signature_owner_name = Some(value),
        "signatureOwnerTitle" => input.signature_owner_title = Some(value),
        "defaultTaxPercent" => {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                let pct = trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|p| p.is_finite() && *p >= 0.0)
                    .ok_or_else(|| {
                        ApiError::BadRequest(
                            "defaultTaxPercent must be a non-negative number".to_string(),
                        )
                    })?;
                input.default_tax_percent = Some(pct);
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_fields_map_onto_input() {
        let mut input = BusinessProfileInput::default();
        apply_text_field(&mut input, "businessName", "Acme".into()).unwrap();
        apply_text_field(&mut input, "defaultTaxPercent", " 12.5 ".into()).unwrap();
        apply_text_field(&mut input, "unknown", "ignored".into()).unwrap();
        assert_eq!(input.business_name.as_deref(), Some("Acme"));
        assert_eq!(input.default_tax_percent, Some(12.5));
    }

    #[test]
    fn bad_tax_percent_is_rejected() {
        let mut input = BusinessProfileInput::default();
        assert!(apply_text_field(&mut input, "defaultTaxPercent", "-1".into()).is_err());
        assert!(apply_text_field(&mut input, "defaultTaxPercent", "abc".into()).is_err());
    }

    #[test]
    fn file_fields_have_slots() {
        let mut form = ProfileForm::default();
        assert!(form.file_slot("logoName").is_some());
        assert!(form.file_slot("signatureNameMeta").is_some());
        assert!(form.file_slot("businessName").is_none());
    }
}
