pub mod sqlite_appointment_repo;
pub mod sqlite_invoice_repo;
pub mod sqlite_user_repo;

pub mod postgres_appointment_repo;
pub mod postgres_invoice_repo;
pub mod postgres_user_repo;

use crate::domain::models::appointment::{Appointment, AppointmentStatus};
use crate::error::AppError;

/// Explains why a conditional appointment write matched no row, given the row
/// as re-read inside the same transaction.
pub(crate) fn explain_missed_write(
    current: Option<Appointment>,
    barber_id: &str,
    allowed_from: &[AppointmentStatus],
) -> AppError {
    match current {
        Some(appt) if appt.is_owned_by(barber_id) => {
            if allowed_from.contains(&appt.status) {
                AppError::Conflict("Time slot is already booked".into())
            } else {
                AppError::InvalidState(format!("Appointment is {}", appt.status))
            }
        }
        _ => AppError::NotFound("Appointment not found".into()),
    }
}
