use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::domain::models::appointment::{total_price, Appointment, ServiceItem};
use crate::error::AppError;

/// Billing record. Written once and never updated.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Invoice {
    pub id: String,
    pub user_id: String,
    pub customer_name: String,
    pub date: NaiveDate,
    pub total_amount: i64,
    #[sqlx(json)]
    pub items: Vec<ServiceItem>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(user_id: String, customer_name: String, date: NaiveDate, items: Vec<ServiceItem>) -> Result<Self, AppError> {
        let total_amount = total_price(&items)
            .ok_or_else(|| AppError::Validation("Invoice total is too large".into()))?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            customer_name,
            date,
            total_amount,
            items,
            created_at: Utc::now(),
        })
    }

    /// Bills an appointment from its frozen booking data. The booked total is
    /// carried over as-is rather than recomputed.
    pub fn from_appointment(appointment: &Appointment, owner_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            customer_name: appointment.customer_name.clone(),
            date: appointment.appointment_date,
            total_amount: appointment.total_amount,
            items: appointment.services.clone(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SalesSummary {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub count: usize,
    pub total_amount: i64,
}
