pub mod appointment;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod invoice;
pub mod public;
