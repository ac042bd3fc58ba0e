use crate::domain::models::{
    appointment::{Appointment, AppointmentFilter, AppointmentStatus},
    invoice::Invoice,
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
}

/// Storage for appointments. Every status-changing method is a conditional
/// write evaluated atomically against other writers; callers never rely on a
/// previous read still being true.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Plain insert. The confirmed-slot unique index still applies.
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    /// Inserts only if no confirmed appointment holds the same slot.
    async fn create_if_slot_free(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_by_barber(&self, barber_id: &str, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError>;
    async fn list_confirmed_times(&self, barber_id: &str, date: NaiveDate) -> Result<Vec<String>, AppError>;
    async fn is_slot_available(
        &self,
        barber_id: &str,
        date: NaiveDate,
        time: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, AppError>;
    /// `pending` -> `confirmed` for the owning barber, re-checking the slot in the same write.
    async fn confirm(&self, id: &str, barber_id: &str) -> Result<Appointment, AppError>;
    /// `pending|confirmed` -> `rejected|cancelled` for the owning barber.
    async fn close(&self, id: &str, barber_id: &str, status: AppointmentStatus) -> Result<Appointment, AppError>;
    /// Inserts the invoice and marks the appointment completed in one transaction.
    async fn complete_with_invoice(
        &self,
        id: &str,
        barber_id: &str,
        invoice: &Invoice,
    ) -> Result<(Appointment, Invoice), AppError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn create(&self, invoice: &Invoice) -> Result<Invoice, AppError>;
    async fn find_by_id(&self, user_id: &str, id: &str) -> Result<Option<Invoice>, AppError>;
    async fn list_by_user(
        &self,
        user_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Invoice>, AppError>;
}
