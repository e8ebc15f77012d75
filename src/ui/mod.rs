//! UI HTML del taller
//!
//! Formularios renderizados en servidor con sesión por cookie. Las rutas se
//! agrupan por política de rol; todas salvo login/register/logout exigen sesión.

pub mod flash;
pub mod handlers;
pub mod views;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::middleware::auth::{ui_require_login, ui_require_role, RolePolicy};
use crate::state::AppState;

use handlers::*;

pub fn ui_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", get(logout));

    let any_user = Router::new()
        .route("/", get(dashboard))
        .route("/vehicles", get(vehicles_page));

    let staff = Router::new()
        .route("/customers/create", get(customer_create_page).post(customer_create))
        .route("/customers/:id/update", get(customer_update_page).post(customer_update))
        .route("/vehicles/create", get(vehicle_create_page).post(vehicle_create))
        .route("/vehicles/:id/update", get(vehicle_update_page).post(vehicle_update))
        .route("/services", get(services_page))
        .route("/services/create", get(service_create_page).post(service_create))
        .route("/services/:id/update", get(service_update_page).post(service_update))
        .route("/mechanics/:id/update", get(mechanic_update_page).post(mechanic_update))
        .route_layer(from_fn_with_state(RolePolicy::STAFF, ui_require_role));

    let admin = Router::new()
        .route("/customers", get(customers_page))
        .route("/customers/:id/delete", post(customer_delete))
        .route("/vehicles/:id/delete", post(vehicle_delete))
        .route("/services/:id/delete", post(service_delete))
        .route("/mechanics", get(mechanics_page))
        .route("/mechanics/create", get(mechanic_create_page).post(mechanic_create))
        .route("/mechanics/:id/delete", post(mechanic_delete))
        .route("/invoices", get(invoices_page))
        .route("/invoices/create", get(invoice_create_page).post(invoice_create))
        .route("/invoices/:id/update", get(invoice_update_page).post(invoice_update))
        .route("/invoices/:id/delete", post(invoice_delete))
        .route_layer(from_fn_with_state(RolePolicy::ADMIN, ui_require_role));

    let protected = any_user
        .merge(staff)
        .merge(admin)
        .route_layer(from_fn_with_state(state, ui_require_login));

    public.merge(protected)
}
