use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{AppointmentListQuery, CreateAppointmentRequest};
use crate::api::dtos::responses::CompletionResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::appointment::{AppointmentFilter, AppointmentStatus};
use crate::domain::services::appointment_service::parse_date;
use crate::error::AppError;
use std::sync::Arc;
use serde_json::json;
use tracing::info;

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.appointment_service.create_confirmed(payload.into(), &user.id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<AppointmentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = query.status.as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<AppointmentStatus>())
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let filter = AppointmentFilter {
        status,
        start_date: optional_date(query.start_date.as_deref())?,
        end_date: optional_date(query.end_date.as_deref())?,
    };

    let appointments = state.appointment_service.list(&user.id, &filter).await?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.appointment_service.get(&id, &user.id).await?))
}

pub async fn confirm_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.appointment_service.confirm(&id, &user.id).await?))
}

pub async fn reject_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.appointment_service.reject(&id, &user.id).await?))
}

pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (appointment, invoice) = state.invoicing_service.complete_appointment(&id, &user.id).await?;
    Ok(Json(CompletionResponse { appointment, invoice }))
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.appointment_service.cancel(&id, &user.id).await?;
    info!("Appointment cancelled: {}", id);
    Ok(Json(json!({"status": "cancelled"})))
}

pub(crate) fn optional_date(raw: Option<&str>) -> Result<Option<chrono::NaiveDate>, AppError> {
    raw.filter(|s| !s.is_empty()).map(parse_date).transpose()
}
