use axum::{
    extract::{Path, State},
    handler::Handler,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, put},
    Json, Router,
};

use crate::controllers::customer_controller::CustomerController;
use crate::dto::api_response::{ApiResponse, WithStatus};
use crate::dto::customer_dto::{CreateCustomerRequest, CustomerSummary, UpdateCustomerRequest};
use crate::middleware::auth::{require_login, require_role, RolePolicy};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::json::ApiJson;

/// Clientes: cualquier usuario con sesión; borrar solo admin
pub fn create_customer_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/customers", get(list_customers).post(create_customer))
        .route(
            "/api/customers/:id",
            put(update_customer)
                .delete(delete_customer.layer(from_fn_with_state(RolePolicy::ADMIN, require_role))),
        )
        .route_layer(from_fn_with_state(state, require_login))
}

async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CustomerSummary>>>, AppError> {
    let controller = CustomerController::new(state.store.clone());
    Ok(Json(controller.list().await?))
}

async fn create_customer(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCustomerRequest>,
) -> Result<WithStatus<CustomerSummary>, AppError> {
    let controller = CustomerController::new(state.store.clone());
    let response = controller.create(request).await?;
    Ok(WithStatus(StatusCode::CREATED, response))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CustomerController::new(state.store.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CustomerController::new(state.store.clone());
    Ok(Json(controller.delete(id).await?))
}
