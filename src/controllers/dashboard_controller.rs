use std::sync::Arc;

use crate::dto::dashboard_dto::DashboardStats;
use crate::models::invoice::{PAYMENT_PAID, PAYMENT_PENDING};
use crate::models::service_request::ServiceStatus;
use crate::repositories::store::GarageStore;
use crate::utils::errors::AppError;

pub struct DashboardController {
    store: Arc<dyn GarageStore>,
}

impl DashboardController {
    pub fn new(store: Arc<dyn GarageStore>) -> Self {
        Self { store }
    }

    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let mut tx = self.store.begin().await?;
        let customers = tx.list_customers().await?;
        let vehicles = tx.list_vehicles().await?;
        let mechanics = tx.list_mechanics().await?;
        let services = tx.list_services().await?;
        let invoices = tx.list_invoices().await?;

        let count_services = |status: ServiceStatus| services.iter().filter(|s| s.status == status).count();
        let count_invoices = |status: &str| invoices.iter().filter(|i| i.payment_status == status).count();

        Ok(DashboardStats {
            total_customers: customers.len(),
            total_vehicles: vehicles.len(),
            total_mechanics: mechanics.len(),
            available_mechanics: mechanics.iter().filter(|m| m.is_available).count(),
            pending_services: count_services(ServiceStatus::Pending),
            completed_services: count_services(ServiceStatus::Completed),
            total_invoices: invoices.len(),
            paid_invoices: count_invoices(PAYMENT_PAID),
            pending_invoices: count_invoices(PAYMENT_PENDING),
        })
    }
}
