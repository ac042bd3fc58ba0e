use std::sync::Arc;
use chrono::NaiveDate;
use tracing::info;

use crate::domain::models::appointment::{Appointment, ServiceItem, MAX_PRICE_CENTS};
use crate::domain::models::invoice::{Invoice, SalesSummary};
use crate::domain::ports::{AppointmentRepository, InvoiceRepository};
use crate::domain::services::appointment_service::{find_owned, parse_date};
use crate::domain::services::lifecycle::{transition, AppointmentEvent};
use crate::error::AppError;

pub struct ManualInvoiceFields {
    pub customer_name: String,
    pub date: String,
    pub items: Vec<ServiceItem>,
}

pub struct InvoicingService {
    appointments: Arc<dyn AppointmentRepository>,
    invoices: Arc<dyn InvoiceRepository>,
}

impl InvoicingService {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { appointments, invoices }
    }

    /// Completes a confirmed appointment and bills it. The invoice insert and
    /// the appointment update commit together or not at all.
    pub async fn complete_appointment(&self, id: &str, caller_id: &str) -> Result<(Appointment, Invoice), AppError> {
        let appt = find_owned(self.appointments.as_ref(), id, caller_id).await?;
        transition(appt.status, AppointmentEvent::Complete)?;

        let invoice = Invoice::from_appointment(&appt, caller_id);
        let (completed, invoice) = self
            .appointments
            .complete_with_invoice(&appt.id, caller_id, &invoice)
            .await?;

        info!("Appointment {} completed with invoice {}", completed.id, invoice.id);
        Ok((completed, invoice))
    }

    pub async fn create_manual(&self, caller_id: &str, fields: ManualInvoiceFields) -> Result<Invoice, AppError> {
        let customer_name = fields.customer_name.trim();
        if customer_name.is_empty() {
            return Err(AppError::Validation("customer_name is required".into()));
        }
        let date = parse_date(fields.date.trim())?;

        if fields.items.is_empty() {
            return Err(AppError::Validation("At least one item is required".into()));
        }
        if fields.items.iter().any(|i| i.name.trim().is_empty() || i.price < 0) {
            return Err(AppError::Validation("Items need a name and a non-negative price".into()));
        }
        if fields.items.iter().any(|i| i.price > MAX_PRICE_CENTS) {
            return Err(AppError::Validation(format!("Item price exceeds {} cents", MAX_PRICE_CENTS)));
        }

        let invoice = Invoice::new(caller_id.to_string(), customer_name.to_string(), date, fields.items)?;
        let created = self.invoices.create(&invoice).await?;
        info!("Manual invoice {} created by {}", created.id, caller_id);
        Ok(created)
    }

    pub async fn get(&self, id: &str, caller_id: &str) -> Result<Invoice, AppError> {
        self.invoices
            .find_by_id(caller_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice not found".into()))
    }

    pub async fn list(
        &self,
        caller_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Invoice>, AppError> {
        if let (Some(s), Some(e)) = (start, end)
            && s > e
        {
            return Err(AppError::Validation("start_date must not be after end_date".into()));
        }
        self.invoices.list_by_user(caller_id, start, end).await
    }

    pub async fn summary(
        &self,
        caller_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<SalesSummary, AppError> {
        let invoices = self.list(caller_id, start, end).await?;
        let total_amount = invoices
            .iter()
            .try_fold(0i64, |acc, i| acc.checked_add(i.total_amount))
            .ok_or_else(|| AppError::InternalWithMsg(format!("Sales total overflowed for {}", caller_id)))?;

        Ok(SalesSummary {
            start_date: start,
            end_date: end,
            count: invoices.len(),
            total_amount,
        })
    }
}
