use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::mechanic_controller::MechanicController;
use crate::dto::api_response::{ApiResponse, WithStatus};
use crate::dto::mechanic_dto::{CreateMechanicRequest, MechanicCreatedResponse, UpdateMechanicRequest};
use crate::models::mechanic::Mechanic;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::json::ApiJson;

pub fn create_mechanic_router() -> Router<AppState> {
    Router::new()
        .route("/api/mechanics/create", post(create_mechanic))
        .route("/api/mechanics/", get(list_mechanics))
        .route("/api/mechanics/:id", get(get_mechanic))
        .route("/api/mechanics/update/:id", put(update_mechanic))
        .route("/api/mechanics/delete/:id", delete(delete_mechanic))
}

async fn create_mechanic(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateMechanicRequest>,
) -> Result<WithStatus<MechanicCreatedResponse>, AppError> {
    let controller = MechanicController::new(state.store.clone());
    let response = controller.create(request).await?;
    Ok(WithStatus(StatusCode::CREATED, response))
}

async fn list_mechanics(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Mechanic>>>, AppError> {
    let controller = MechanicController::new(state.store.clone());
    Ok(Json(ApiResponse::success(controller.list().await?)))
}

async fn get_mechanic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Mechanic>>, AppError> {
    let controller = MechanicController::new(state.store.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn update_mechanic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateMechanicRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MechanicController::new(state.store.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_mechanic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MechanicController::new(state.store.clone());
    Ok(Json(controller.delete(id).await?))
}
