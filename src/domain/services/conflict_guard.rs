use std::sync::Arc;
use chrono::NaiveDate;
use tracing::warn;

use crate::domain::ports::AppointmentRepository;
use crate::error::AppError;

/// Fail-closed slot check run before any transition into `confirmed` or a
/// public booking. The repository's conditional writes repeat the same
/// predicate atomically.
pub struct ConflictGuard {
    repo: Arc<dyn AppointmentRepository>,
}

impl ConflictGuard {
    pub fn new(repo: Arc<dyn AppointmentRepository>) -> Self {
        Self { repo }
    }

    pub async fn check_available(
        &self,
        barber_id: &str,
        date: NaiveDate,
        time: &str,
        exclude_appointment_id: Option<&str>,
    ) -> Result<bool, AppError> {
        self.repo.is_slot_available(barber_id, date, time, exclude_appointment_id).await
    }

    pub async fn ensure_available(
        &self,
        barber_id: &str,
        date: NaiveDate,
        time: &str,
        exclude_appointment_id: Option<&str>,
    ) -> Result<(), AppError> {
        if self.check_available(barber_id, date, time, exclude_appointment_id).await? {
            Ok(())
        } else {
            warn!("Slot {} {} already confirmed for barber {}", date, time, barber_id);
            Err(AppError::Conflict("Time slot is already booked".into()))
        }
    }
}
