use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::service_request_controller::ServiceRequestController;
use crate::dto::api_response::{ApiResponse, WithStatus};
use crate::dto::service_dto::{CreateServiceRequest, ServiceCreatedResponse, UpdateServiceRequest};
use crate::models::service_request::ServiceRequest;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::json::ApiJson;

/// API JSON de órdenes de servicio. Las rutas de colección llevan barra
/// final; `/services` sin barra es la página de la UI.
pub fn create_service_router() -> Router<AppState> {
    Router::new()
        .route("/services/", post(create_service).get(list_services))
        .route(
            "/services/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
}

fn controller(state: &AppState) -> ServiceRequestController {
    ServiceRequestController::new(state.store.clone(), state.config.api_update_policy)
}

async fn create_service(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateServiceRequest>,
) -> Result<WithStatus<ServiceCreatedResponse>, AppError> {
    let response = controller(&state).create(request).await?;
    Ok(WithStatus(StatusCode::CREATED, response))
}

async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ServiceRequest>>>, AppError> {
    let services = controller(&state).list().await?;
    Ok(Json(ApiResponse::success(services)))
}

async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ServiceRequest>>, AppError> {
    let service = controller(&state).get_by_id(id).await?;
    Ok(Json(ApiResponse::success(service)))
}

async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateServiceRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = controller(&state).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = controller(&state).delete(id).await?;
    Ok(Json(response))
}
