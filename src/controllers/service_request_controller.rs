use std::sync::Arc;

use crate::config::environment::ApiUpdatePolicy;
use crate::dto::api_response::ApiResponse;
use crate::dto::service_dto::{CreateServiceRequest, ServiceCreatedResponse, UpdateServiceRequest};
use crate::models::service_request::ServiceRequest;
use crate::repositories::store::GarageStore;
use crate::services::service_request_service::ServiceRequestService;
use crate::utils::errors::AppError;

pub struct ServiceRequestController {
    service: ServiceRequestService,
}

impl ServiceRequestController {
    pub fn new(store: Arc<dyn GarageStore>, api_update_policy: ApiUpdatePolicy) -> Self {
        Self {
            service: ServiceRequestService::new(store, api_update_policy),
        }
    }

    pub async fn create(
        &self,
        request: CreateServiceRequest,
    ) -> Result<ApiResponse<ServiceCreatedResponse>, AppError> {
        let draft = request.into_draft()?;
        let service = self.service.create(draft).await?;

        Ok(ApiResponse::success_with_message(
            ServiceCreatedResponse {
                id: service.id,
                status: service.status,
                assigned_mechanic_id: service.assigned_mechanic_id,
            },
            "Service request created",
        ))
    }

    pub async fn list(&self) -> Result<Vec<ServiceRequest>, AppError> {
        self.service.list().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<ServiceRequest, AppError> {
        self.service.get(id).await
    }

    pub async fn update(&self, id: i64, request: UpdateServiceRequest) -> Result<ApiResponse<()>, AppError> {
        self.service.update(id, request.into()).await?;
        Ok(ApiResponse::message("Service status updated successfully"))
    }

    pub async fn delete(&self, id: i64) -> Result<ApiResponse<()>, AppError> {
        self.service.delete(id).await?;
        Ok(ApiResponse::message("Service request deleted successfully"))
    }
}
