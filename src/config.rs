use std::env;

use crate::domain::models::catalog::ServiceCatalog;
use crate::domain::services::slot_calendar::SlotSchedule;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub schedule: SlotSchedule,
    pub catalog: ServiceCatalog,
}

impl Config {
    pub fn from_env() -> Self {
        let day_start = env::var("SLOT_DAY_START").unwrap_or_else(|_| "09:00".to_string());
        let day_end = env::var("SLOT_DAY_END").unwrap_or_else(|_| "18:00".to_string());
        let interval: u32 = env::var("SLOT_INTERVAL_MIN").unwrap_or_else(|_| "30".to_string()).parse().expect("SLOT_INTERVAL_MIN must be a number");

        let schedule = SlotSchedule::from_hours(&day_start, &day_end, interval)
            .expect("SLOT_DAY_START/SLOT_DAY_END/SLOT_INTERVAL_MIN do not form a valid schedule");

        let catalog = match env::var("SERVICE_CATALOG") {
            Ok(raw) => ServiceCatalog::from_json(&raw).expect("SERVICE_CATALOG must be a JSON array of {id, name, price}"),
            Err(_) => ServiceCatalog::default(),
        };

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.barbershop.local".to_string()),
            schedule,
            catalog,
        }
    }
}
