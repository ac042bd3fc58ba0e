pub mod appointment_service;
pub mod auth_service;
pub mod conflict_guard;
pub mod invoicing;
pub mod lifecycle;
pub mod slot_calendar;
