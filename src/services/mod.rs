//! Services module
//!
//! Este módulo contiene la lógica de negocio de las órdenes de servicio y la
//! coordinación de disponibilidad de mecánicos.

pub mod availability;
pub mod service_request_service;

pub use availability::AvailabilityCoordinator;
pub use service_request_service::ServiceRequestService;
