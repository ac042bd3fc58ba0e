use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Rejected,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Rejected => "rejected",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Rejected | AppointmentStatus::Cancelled
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown appointment status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "rejected" => Ok(AppointmentStatus::Rejected),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for AppointmentStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Ceiling for any single price, in cents.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Sum of item prices, or `None` when it does not fit in an `i64`.
pub fn total_price(items: &[ServiceItem]) -> Option<i64> {
    items.iter().try_fold(0i64, |acc, item| acc.checked_add(item.price))
}

/// Price snapshot of a catalog service, frozen when the booking is made.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceItem {
    pub service_id: i64,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub barber_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    #[sqlx(json)]
    pub services: Vec<ServiceItem>,
    pub total_amount: i64,
    #[sqlx(try_from = "String")]
    pub status: AppointmentStatus,
    pub invoice_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub barber_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub date: NaiveDate,
    pub time: String,
    pub services: Vec<ServiceItem>,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Result<Self, AppError> {
        let total_amount = total_price(&params.services)
            .ok_or_else(|| AppError::Validation("Booking total is too large".into()))?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            barber_id: params.barber_id,
            customer_name: params.customer_name,
            customer_phone: params.customer_phone,
            appointment_date: params.date,
            appointment_time: params.time,
            services: params.services,
            total_amount,
            status: params.status,
            invoice_id: None,
            created_at: Utc::now(),
        })
    }

    pub fn is_owned_by(&self, caller_id: &str) -> bool {
        self.barber_id == caller_id
    }
}

/// Optional narrowing applied when a barber lists their appointments.
#[derive(Debug, Default, Clone)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_snapshot_prices() {
        let appt = Appointment::new(NewAppointmentParams {
            barber_id: "b1".into(),
            customer_name: "Joe".into(),
            customer_phone: "555".into(),
            date: NaiveDate::from_ymd_opt(2030, 1, 7).unwrap(),
            time: "09:00".into(),
            services: vec![
                ServiceItem { service_id: 1, name: "Haircut".into(), price: 2000 },
                ServiceItem { service_id: 3, name: "Beard Trim".into(), price: 1000 },
            ],
            status: AppointmentStatus::Pending,
        }).unwrap();

        assert_eq!(appt.total_amount, 3000);
        assert!(appt.invoice_id.is_none());
        assert!(appt.is_owned_by("b1"));
        assert!(!appt.is_owned_by("b2"));
    }

    #[test]
    fn test_total_price_refuses_overflow() {
        let item = |price| ServiceItem { service_id: 0, name: "x".into(), price };
        assert_eq!(total_price(&[item(1), item(2)]), Some(3));
        assert_eq!(total_price(&[]), Some(0));
        assert_eq!(total_price(&[item(i64::MAX), item(1)]), None);
    }

    #[test]
    fn test_status_round_trips_through_storage_text() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Rejected,
            AppointmentStatus::Cancelled,
        ] {
            let parsed = AppointmentStatus::try_from(status.as_str().to_string()).unwrap();
            assert_eq!(parsed, status);
        }
        assert!("booked".parse::<AppointmentStatus>().is_err());
    }
}
