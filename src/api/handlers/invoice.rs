use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateInvoiceRequest, DateRangeQuery};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::appointment::optional_date;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.invoicing_service.create_manual(&user.id, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_invoices(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let start = optional_date(query.start_date.as_deref())?;
    let end = optional_date(query.end_date.as_deref())?;
    Ok(Json(state.invoicing_service.list(&user.id, start, end).await?))
}

pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.invoicing_service.get(&id, &user.id).await?))
}

pub async fn sales_summary(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let start = optional_date(query.start_date.as_deref())?;
    let end = optional_date(query.end_date.as_deref())?;
    Ok(Json(state.invoicing_service.summary(&user.id, start, end).await?))
}
