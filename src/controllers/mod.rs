//! Controladores
//!
//! Orquestan DTO -> validación -> almacenamiento para cada entidad.

pub mod auth_controller;
pub mod customer_controller;
pub mod dashboard_controller;
pub mod invoice_controller;
pub mod mechanic_controller;
pub mod service_request_controller;
pub mod vehicle_controller;
