use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::mechanic::NewMechanic;
use crate::utils::errors::{AppError, AppResult};

fn default_available() -> bool {
    true
}

// Request para registrar un mecánico
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMechanicRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, length(min = 1, max = 15))]
    pub phone: Option<String>,
    pub specialization: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

impl CreateMechanicRequest {
    pub fn into_new_mechanic(self) -> AppResult<NewMechanic> {
        let missing = || AppError::BadRequest("Missing required fields: name, phone".to_string());
        self.validate().map_err(|_| missing())?;

        Ok(NewMechanic {
            name: self.name.ok_or_else(missing)?,
            phone: self.phone.ok_or_else(missing)?,
            specialization: self.specialization,
            is_available: self.is_available,
        })
    }
}

// Request para actualizar un mecánico.
// `is_available` escribe el flag directamente, sin pasar por las órdenes.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMechanicRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MechanicCreatedResponse {
    pub id: i64,
    pub name: String,
    pub specialization: Option<String>,
}
