//! `/api/invoice` CRUD, scoped to the authenticated owner
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use invoice_core::{Invoice, InvoiceInput, RequestContext};
use serde_json::{json, Value};
use tracing::info;

use super::bad_json;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Value>> {
    let invoices = state.invoices.list_for_owner(&ctx.owner).await?;
    Ok(Json(json!({ "success": true, "data": invoices })))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let invoice = state.invoices.get(&ctx.owner, &id).await?;
    Ok(Json(json!({ "success": true, "data": invoice })))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Json<InvoiceInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(input) = body.map_err(bad_json)?;
    let invoice = Invoice::from_input(&ctx.owner, input)?;
    let invoice = state.invoices.create(invoice).await?;
    info!(id = %invoice.id, number = %invoice.invoice_number, "Invoice created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Invoice created", "data": invoice })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: Result<Json<InvoiceInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = body.map_err(bad_json)?;
    let mut invoice = state.invoices.get(&ctx.owner, &id).await?;
    invoice.apply(input)?;
    let invoice = state.invoices.update(invoice).await?;
    Ok(Json(json!({ "success": true, "message": "Invoice updated", "data": invoice })))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.invoices.delete(&ctx.owner, &id).await?;
    info!(id = %id, "Invoice deleted");
    Ok(Json(json!({ "success": true, "message": "Invoice deleted" })))
}
