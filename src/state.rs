use std::sync::Arc;
use crate::domain::ports::{AppointmentRepository, InvoiceRepository, UserRepository};
use crate::domain::services::{
    appointment_service::AppointmentService, auth_service::AuthService, invoicing::InvoicingService,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub invoice_repo: Arc<dyn InvoiceRepository>,
    pub auth_service: Arc<AuthService>,
    pub appointment_service: Arc<AppointmentService>,
    pub invoicing_service: Arc<InvoicingService>,
}

impl AppState {
    /// Wires the domain services over a set of storage adapters.
    pub fn new(
        config: Config,
        user_repo: Arc<dyn UserRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
        invoice_repo: Arc<dyn InvoiceRepository>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        let appointment_service = Arc::new(AppointmentService::new(
            appointment_repo.clone(),
            user_repo.clone(),
            config.schedule.clone(),
            config.catalog.clone(),
        ));
        let invoicing_service = Arc::new(InvoicingService::new(appointment_repo.clone(), invoice_repo.clone()));

        Self {
            config,
            user_repo,
            appointment_repo,
            invoice_repo,
            auth_service,
            appointment_service,
            invoicing_service,
        }
    }
}
