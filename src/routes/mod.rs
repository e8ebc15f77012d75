//! Rutas de la API JSON

pub mod auth_routes;
pub mod customer_routes;
pub mod invoice_routes;
pub mod mechanic_routes;
pub mod service_routes;
pub mod vehicle_routes;

use axum::Router;

use crate::state::AppState;

/// Router de la API JSON completa
pub fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth_routes::create_auth_router())
        .merge(service_routes::create_service_router())
        .merge(vehicle_routes::create_vehicle_router())
        .merge(mechanic_routes::create_mechanic_router())
        .merge(invoice_routes::create_invoice_router())
        .merge(customer_routes::create_customer_router(state))
}
