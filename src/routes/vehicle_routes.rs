use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::api_response::{ApiResponse, WithStatus};
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleCreatedResponse};
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::json::ApiJson;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles/", post(create_vehicle).get(list_vehicles))
        .route(
            "/vehicles/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

async fn create_vehicle(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateVehicleRequest>,
) -> Result<WithStatus<VehicleCreatedResponse>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    let response = controller.create(request).await?;
    Ok(WithStatus(StatusCode::CREATED, response))
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    let vehicles = controller.list().await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    let vehicle = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(vehicle)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
