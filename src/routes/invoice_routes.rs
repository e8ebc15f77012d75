use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::invoice_controller::InvoiceController;
use crate::dto::api_response::{ApiResponse, WithStatus};
use crate::dto::invoice_dto::{CreateInvoiceRequest, InvoiceCreatedResponse, UpdateInvoiceRequest};
use crate::models::invoice::Invoice;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::json::ApiJson;

pub fn create_invoice_router() -> Router<AppState> {
    Router::new()
        .route("/api/invoices/create", post(create_invoice))
        .route("/api/invoices/", get(list_invoices))
        .route("/api/invoices/:id", get(get_invoice))
        .route("/api/invoices/update/:id", put(update_invoice))
        .route("/api/invoices/delete/:id", delete(delete_invoice))
}

async fn create_invoice(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateInvoiceRequest>,
) -> Result<WithStatus<InvoiceCreatedResponse>, AppError> {
    let controller = InvoiceController::new(state.store.clone());
    let response = controller.create(request).await?;
    Ok(WithStatus(StatusCode::CREATED, response))
}

async fn list_invoices(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Invoice>>>, AppError> {
    let controller = InvoiceController::new(state.store.clone());
    Ok(Json(ApiResponse::success(controller.list().await?)))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Invoice>>, AppError> {
    let controller = InvoiceController::new(state.store.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateInvoiceRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = InvoiceController::new(state.store.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = InvoiceController::new(state.store.clone());
    Ok(Json(controller.delete(id).await?))
}
