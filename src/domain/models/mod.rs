pub mod appointment;
pub mod auth;
pub mod catalog;
pub mod invoice;
pub mod user;
