use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::service_request::ServiceStatus;
use crate::services::service_request_service::{ServiceChanges, ServiceDraft};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{present, validate_not_empty};

const MISSING_SERVICE_FIELDS: &str = "Missing required service fields";

// Request para crear una orden de servicio
#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(required)]
    pub vehicle_id: Option<i64>,
    #[validate(required, custom = "validate_not_empty")]
    pub service_type: Option<String>,
    #[validate(required, custom = "validate_not_empty")]
    pub service_date: Option<String>,
    #[validate(required, custom = "validate_not_empty")]
    pub problem_description: Option<String>,
    pub assigned_mechanic_id: Option<i64>,
}

impl CreateServiceRequest {
    pub fn into_draft(self) -> AppResult<ServiceDraft> {
        self.validate()
            .map_err(|_| AppError::BadRequest(MISSING_SERVICE_FIELDS.to_string()))?;

        match (
            self.vehicle_id,
            self.service_type,
            self.service_date,
            self.problem_description,
        ) {
            (Some(vehicle_id), Some(service_type), Some(service_date), Some(problem_description)) => {
                Ok(ServiceDraft {
                    vehicle_id,
                    service_type,
                    service_date,
                    problem_description,
                    assigned_mechanic_id: self.assigned_mechanic_id,
                })
            }
            _ => Err(AppError::BadRequest(MISSING_SERVICE_FIELDS.to_string())),
        }
    }
}

// Request para actualizar una orden: distingue campo ausente de `null`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateServiceRequest {
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub problem_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub assigned_mechanic_id: Option<Option<i64>>,
}

impl From<UpdateServiceRequest> for ServiceChanges {
    fn from(request: UpdateServiceRequest) -> Self {
        Self {
            // `"status": null` se valida como literal vacío y se rechaza
            status: request.status.map(Option::unwrap_or_default),
            problem_description: request.problem_description,
            assigned_mechanic_id: request.assigned_mechanic_id,
        }
    }
}

// Response de alta
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceCreatedResponse {
    pub id: i64,
    pub status: ServiceStatus,
    pub assigned_mechanic_id: Option<i64>,
}
