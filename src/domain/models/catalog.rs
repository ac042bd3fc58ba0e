use serde::{Deserialize, Serialize};

use crate::domain::models::appointment::{ServiceItem, MAX_PRICE_CENTS};
use crate::error::AppError;

/// An offered service and its current price in cents.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CatalogService {
    pub id: i64,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: Vec<CatalogService>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<CatalogService>) -> Self {
        Self { services }
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let services: Vec<CatalogService> = serde_json::from_str(raw)
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid service catalog: {}", e)))?;

        if let Some(bad) = services.iter().find(|s| !(0..=MAX_PRICE_CENTS).contains(&s.price)) {
            return Err(AppError::InternalWithMsg(format!("Price out of range for service {}", bad.id)));
        }
        Ok(Self::new(services))
    }

    pub fn services(&self) -> &[CatalogService] {
        &self.services
    }

    /// Resolves requested ids into price snapshots, keeping request order.
    pub fn snapshot(&self, service_ids: &[i64]) -> Result<Vec<ServiceItem>, AppError> {
        if service_ids.is_empty() {
            return Err(AppError::Validation("At least one service is required".into()));
        }

        service_ids
            .iter()
            .map(|id| {
                self.services
                    .iter()
                    .find(|s| s.id == *id)
                    .map(|s| ServiceItem {
                        service_id: s.id,
                        name: s.name.clone(),
                        price: s.price,
                    })
                    .ok_or_else(|| AppError::Validation(format!("Unknown service id {}", id)))
            })
            .collect()
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        let entry = |id, name: &str, price| CatalogService { id, name: name.to_string(), price };
        Self::new(vec![
            entry(1, "Haircut", 2000),
            entry(2, "Shave", 1500),
            entry(3, "Beard Trim", 1000),
            entry(4, "Hair Wash", 500),
            entry(5, "Full Service", 4000),
        ])
    }
}
