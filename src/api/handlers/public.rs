use axum::{extract::{Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateAppointmentRequest, SlotsQuery};
use crate::api::dtos::responses::{BarberResponse, SlotsResponse};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_barbers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let barbers: Vec<BarberResponse> = state.user_repo.list().await?
        .into_iter()
        .map(|u| BarberResponse { id: u.id, username: u.username })
        .collect();
    Ok(Json(barbers))
}

pub async fn available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let slots = state.appointment_service.list_slots(&query.date, &query.barber_id).await?;

    Ok(Json(SlotsResponse {
        date: query.date,
        barber_id: query.barber_id,
        slots,
    }))
}

pub async fn create_public_appointment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_public_appointment: {} at {}", payload.appointment_date, payload.appointment_time);

    let created = state.appointment_service.create_pending(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
