//! DTOs de la API JSON
//!
//! Cuerpos de entrada y salida de cada endpoint, separados de los modelos.

pub mod api_response;
pub mod auth_dto;
pub mod customer_dto;
pub mod dashboard_dto;
pub mod invoice_dto;
pub mod mechanic_dto;
pub mod service_dto;
pub mod vehicle_dto;
