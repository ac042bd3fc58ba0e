use std::sync::Arc;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::models::appointment::{
    Appointment, AppointmentFilter, AppointmentStatus, NewAppointmentParams,
};
use crate::domain::models::catalog::ServiceCatalog;
use crate::domain::ports::{AppointmentRepository, UserRepository};
use crate::domain::services::conflict_guard::ConflictGuard;
use crate::domain::services::lifecycle::{transition, AppointmentEvent};
use crate::domain::services::slot_calendar::{available_slots, parse_label, SlotSchedule};
use crate::error::AppError;

/// Raw booking input as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct BookingFields {
    pub customer_name: String,
    pub customer_phone: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub service_ids: Vec<i64>,
    pub barber_id: Option<String>,
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Loads an appointment only if `caller_id` owns it. Absent and foreign
/// appointments produce the same `NotFound` so existence is never revealed.
pub async fn find_owned(
    repo: &dyn AppointmentRepository,
    id: &str,
    caller_id: &str,
) -> Result<Appointment, AppError> {
    repo.find_by_id(id)
        .await?
        .filter(|a| a.is_owned_by(caller_id))
        .ok_or_else(|| AppError::NotFound("Appointment not found".into()))
}

pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    users: Arc<dyn UserRepository>,
    guard: ConflictGuard,
    schedule: SlotSchedule,
    catalog: ServiceCatalog,
}

impl AppointmentService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        users: Arc<dyn UserRepository>,
        schedule: SlotSchedule,
        catalog: ServiceCatalog,
    ) -> Self {
        let guard = ConflictGuard::new(appointments.clone());
        Self { appointments, users, guard, schedule, catalog }
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub async fn list_slots(&self, date: &str, barber_id: &str) -> Result<Vec<String>, AppError> {
        let date = parse_date(date)?;
        let barber_id = required(barber_id, "barber_id")?;
        self.ensure_barber_exists(&barber_id).await?;

        let confirmed = self.appointments.list_confirmed_times(&barber_id, date).await?;
        Ok(available_slots(&self.schedule, &confirmed))
    }

    /// Public self-service booking. Lands in `pending`; refused if the slot is
    /// already held by a confirmed appointment.
    pub async fn create_pending(&self, fields: BookingFields) -> Result<Appointment, AppError> {
        let barber_id = fields
            .barber_id
            .as_deref()
            .map(|b| required(b, "barber_id"))
            .transpose()?
            .ok_or_else(|| AppError::Validation("barber_id is required".into()))?;

        let params = self.validate(&fields, barber_id, AppointmentStatus::Pending)?;
        if !self.schedule.contains(&params.time) {
            return Err(AppError::Validation("Requested time is not a bookable slot".into()));
        }
        self.ensure_barber_exists(&params.barber_id).await?;

        self.guard
            .ensure_available(&params.barber_id, params.date, &params.time, None)
            .await?;

        let created = self.appointments.create_if_slot_free(&Appointment::new(params)?).await?;
        info!("Pending appointment {} created for barber {}", created.id, created.barber_id);
        Ok(created)
    }

    /// Barber-entered booking, confirmed immediately without a guard query.
    /// The confirmed-slot unique index still rejects an exact double booking.
    pub async fn create_confirmed(&self, fields: BookingFields, caller_id: &str) -> Result<Appointment, AppError> {
        let barber_id = match fields.barber_id.as_deref().map(str::trim) {
            Some(b) if !b.is_empty() => b.to_string(),
            _ => caller_id.to_string(),
        };

        let params = self.validate(&fields, barber_id, AppointmentStatus::Confirmed)?;
        if params.barber_id != caller_id {
            self.ensure_barber_exists(&params.barber_id).await?;
        }

        let created = self.appointments.create(&Appointment::new(params)?).await?;
        info!("Confirmed appointment {} booked by barber {}", created.id, caller_id);
        Ok(created)
    }

    pub async fn confirm(&self, id: &str, caller_id: &str) -> Result<Appointment, AppError> {
        let appt = find_owned(self.appointments.as_ref(), id, caller_id).await?;
        transition(appt.status, AppointmentEvent::Confirm)?;

        self.guard
            .ensure_available(&appt.barber_id, appt.appointment_date, &appt.appointment_time, Some(&appt.id))
            .await?;

        let confirmed = self.appointments.confirm(&appt.id, caller_id).await?;
        info!("Appointment {} confirmed", confirmed.id);
        Ok(confirmed)
    }

    pub async fn reject(&self, id: &str, caller_id: &str) -> Result<Appointment, AppError> {
        self.close(id, caller_id, AppointmentEvent::Reject).await
    }

    pub async fn cancel(&self, id: &str, caller_id: &str) -> Result<Appointment, AppError> {
        self.close(id, caller_id, AppointmentEvent::Cancel).await
    }

    async fn close(&self, id: &str, caller_id: &str, event: AppointmentEvent) -> Result<Appointment, AppError> {
        let appt = find_owned(self.appointments.as_ref(), id, caller_id).await?;
        let target = transition(appt.status, event)?;

        let closed = self.appointments.close(&appt.id, caller_id, target).await?;
        info!("Appointment {} moved {} -> {}", closed.id, appt.status, closed.status);
        Ok(closed)
    }

    pub async fn get(&self, id: &str, caller_id: &str) -> Result<Appointment, AppError> {
        find_owned(self.appointments.as_ref(), id, caller_id).await
    }

    pub async fn list(&self, caller_id: &str, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date)
            && start > end
        {
            return Err(AppError::Validation("start_date must not be after end_date".into()));
        }
        self.appointments.list_by_barber(caller_id, filter).await
    }

    fn validate(
        &self,
        fields: &BookingFields,
        barber_id: String,
        status: AppointmentStatus,
    ) -> Result<NewAppointmentParams, AppError> {
        let customer_name = required(&fields.customer_name, "customer_name")?;
        let customer_phone = required(&fields.customer_phone, "customer_phone")?;
        let date = parse_date(fields.appointment_date.trim())?;
        let time = fields.appointment_time.trim().to_string();
        parse_label(&time)?;
        let services = self.catalog.snapshot(&fields.service_ids)?;

        Ok(NewAppointmentParams {
            barber_id,
            customer_name,
            customer_phone,
            date,
            time,
            services,
            status,
        })
    }

    async fn ensure_barber_exists(&self, barber_id: &str) -> Result<(), AppError> {
        if self.users.find_by_id(barber_id).await?.is_none() {
            warn!("Booking refused for unknown barber {}", barber_id);
            return Err(AppError::Validation("Unknown barber".into()));
        }
        Ok(())
    }
}
