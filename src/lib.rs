//! Garage Manager
//!
//! Backend de gestión de un taller: clientes, vehículos, órdenes de servicio,
//! mecánicos y facturas. Expone una API JSON y una UI HTML sobre el mismo
//! almacenamiento transaccional.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod ui;
pub mod utils;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Router completo: API JSON + UI, con CORS y trazas HTTP
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(routes::api_router(state.clone()))
        .merge(ui::ui_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
