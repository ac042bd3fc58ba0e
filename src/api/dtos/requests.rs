use crate::domain::models::appointment::ServiceItem;
use crate::domain::services::appointment_service::BookingFields;
use crate::domain::services::invoicing::ManualInvoiceFields;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub appointment_date: String,
    #[serde(default)]
    pub appointment_time: String,
    #[serde(default)]
    pub service_ids: Vec<i64>,
    pub barber_id: Option<String>,
}

impl From<CreateAppointmentRequest> for BookingFields {
    fn from(req: CreateAppointmentRequest) -> Self {
        Self {
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            appointment_date: req.appointment_date,
            appointment_time: req.appointment_time,
            service_ids: req.service_ids,
            barber_id: req.barber_id,
        }
    }
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub barber_id: String,
}

#[derive(Deserialize, Default)]
pub struct AppointmentListQuery {
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub items: Vec<ServiceItem>,
}

impl From<CreateInvoiceRequest> for ManualInvoiceFields {
    fn from(req: CreateInvoiceRequest) -> Self {
        Self {
            customer_name: req.customer_name,
            date: req.date,
            items: req.items,
        }
    }
}
