use crate::domain::models::{appointment::Appointment, invoice::Invoice};
use serde::Serialize;

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub barber_id: String,
    pub slots: Vec<String>,
}

#[derive(Serialize)]
pub struct BarberResponse {
    pub id: String,
    pub username: String,
}

#[derive(Serialize)]
pub struct CompletionResponse {
    pub appointment: Appointment,
    pub invoice: Invoice,
}
