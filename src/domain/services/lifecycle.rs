//! Appointment state machine.
//!
//! ```text
//! pending   --confirm-->  confirmed
//! pending   --reject--->  rejected     confirmed --reject--> rejected
//! pending   --cancel--->  cancelled    confirmed --cancel--> cancelled
//! confirmed --complete->  completed
//! ```
//! `completed`, `rejected` and `cancelled` accept no further events.

use crate::domain::models::appointment::AppointmentStatus;
use crate::error::AppError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentEvent {
    Confirm,
    Reject,
    Cancel,
    Complete,
}

impl fmt::Display for AppointmentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppointmentEvent::Confirm => "confirm",
            AppointmentEvent::Reject => "reject",
            AppointmentEvent::Cancel => "cancel",
            AppointmentEvent::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Target status for `event` applied in `from`, or `InvalidState`.
pub fn transition(from: AppointmentStatus, event: AppointmentEvent) -> Result<AppointmentStatus, AppError> {
    use AppointmentEvent::*;
    use AppointmentStatus::*;

    if from.is_terminal() {
        return Err(AppError::InvalidState(format!(
            "Appointment is {} and cannot change any more",
            from
        )));
    }

    match (from, event) {
        (Pending, Confirm) => Ok(Confirmed),
        (Pending | Confirmed, Reject) => Ok(Rejected),
        (Pending | Confirmed, Cancel) => Ok(Cancelled),
        (Confirmed, Complete) => Ok(Completed),
        (from, event) => Err(AppError::InvalidState(format!(
            "Cannot {} an appointment that is {}",
            event, from
        ))),
    }
}
