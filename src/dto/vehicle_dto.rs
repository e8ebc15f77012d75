use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::vehicle::NewVehicle;
use crate::utils::errors::{AppError, AppResult};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(required)]
    pub customer_id: Option<i64>,
    #[validate(required, length(min = 1))]
    pub vehicle_number: Option<String>,
    #[validate(required, length(min = 1))]
    pub vehicle_type: Option<String>,
    #[validate(required, length(min = 1))]
    pub brand: Option<String>,
    #[validate(required, length(min = 1))]
    pub model: Option<String>,
}

impl CreateVehicleRequest {
    pub fn into_new_vehicle(self) -> AppResult<NewVehicle> {
        let missing = || AppError::BadRequest("Missing required vehicle fields".to_string());
        self.validate().map_err(|_| missing())?;

        Ok(NewVehicle {
            customer_id: self.customer_id.ok_or_else(missing)?,
            vehicle_number: self.vehicle_number.ok_or_else(missing)?,
            vehicle_type: self.vehicle_type.ok_or_else(missing)?,
            brand: self.brand.ok_or_else(missing)?,
            model: self.model.ok_or_else(missing)?,
        })
    }
}

// Request para actualizar un vehículo
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVehicleRequest {
    pub vehicle_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

// Response de alta
#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleCreatedResponse {
    pub id: i64,
    pub vehicle_number: String,
    pub customer_id: i64,
}
