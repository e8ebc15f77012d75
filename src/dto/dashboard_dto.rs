use serde::{Deserialize, Serialize};

// Contadores del panel principal
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_customers: usize,
    pub total_vehicles: usize,
    pub total_mechanics: usize,
    pub available_mechanics: usize,
    pub pending_services: usize,
    pub completed_services: usize,
    pub total_invoices: usize,
    pub paid_invoices: usize,
    pub pending_invoices: usize,
}
