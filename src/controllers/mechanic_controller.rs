use std::sync::Arc;

use crate::dto::api_response::ApiResponse;
use crate::dto::mechanic_dto::{CreateMechanicRequest, MechanicCreatedResponse, UpdateMechanicRequest};
use crate::models::mechanic::{Mechanic, NewMechanic};
use crate::repositories::store::GarageStore;
use crate::utils::errors::{conflict_on_integrity, not_found_error, AppError};

const DUPLICATE_PHONE: &str = "Mechanic with this phone number already exists";
const STILL_ASSIGNED: &str = "Cannot delete mechanic while assigned to service requests";

pub struct MechanicController {
    store: Arc<dyn GarageStore>,
}

impl MechanicController {
    pub fn new(store: Arc<dyn GarageStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        request: CreateMechanicRequest,
    ) -> Result<ApiResponse<MechanicCreatedResponse>, AppError> {
        let mechanic = self.insert(request.into_new_mechanic()?).await?;
        Ok(ApiResponse::success_with_message(
            MechanicCreatedResponse {
                id: mechanic.id,
                name: mechanic.name,
                specialization: mechanic.specialization,
            },
            "Mechanic created successfully",
        ))
    }

    pub async fn insert(&self, new_mechanic: NewMechanic) -> Result<Mechanic, AppError> {
        let mut tx = self.store.begin().await?;

        if tx.find_mechanic_by_phone(&new_mechanic.phone).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_PHONE.to_string()));
        }

        let mechanic = tx
            .insert_mechanic(new_mechanic)
            .await
            .map_err(conflict_on_integrity(DUPLICATE_PHONE))?;
        tx.commit().await.map_err(conflict_on_integrity(DUPLICATE_PHONE))?;

        log::info!("🔧 Mecánico {} registrado", mechanic.id);
        Ok(mechanic)
    }

    pub async fn list(&self) -> Result<Vec<Mechanic>, AppError> {
        let mut tx = self.store.begin().await?;
        let mechanics = tx.list_mechanics().await?;
        Ok(mechanics)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Mechanic, AppError> {
        let mut tx = self.store.begin().await?;
        let mechanic = tx.find_mechanic(id).await?;
        mechanic.ok_or_else(|| not_found_error("Mechanic"))
    }

    /// Actualización parcial. Escribir `is_available` aquí no pasa por el
    /// coordinador: es la vía manual para corregir el flag.
    pub async fn update(&self, id: i64, request: UpdateMechanicRequest) -> Result<ApiResponse<()>, AppError> {
        let mut tx = self.store.begin().await?;
        let mut mechanic = tx
            .find_mechanic(id)
            .await?
            .ok_or_else(|| not_found_error("Mechanic"))?;

        if let Some(name) = request.name {
            mechanic.name = name;
        }
        if let Some(phone) = request.phone {
            mechanic.phone = phone;
        }
        if request.specialization.is_some() {
            mechanic.specialization = request.specialization;
        }
        if let Some(is_available) = request.is_available {
            if is_available != mechanic.is_available {
                log::warn!("⚠️ Disponibilidad del mecánico {} forzada a {}", id, is_available);
            }
            mechanic.is_available = is_available;
        }

        tx.update_mechanic(&mechanic)
            .await
            .map_err(conflict_on_integrity(DUPLICATE_PHONE))?;
        tx.commit().await.map_err(conflict_on_integrity(DUPLICATE_PHONE))?;

        Ok(ApiResponse::message("Mechanic updated successfully"))
    }

    pub async fn delete(&self, id: i64) -> Result<ApiResponse<()>, AppError> {
        let mut tx = self.store.begin().await?;
        if tx.find_mechanic(id).await?.is_none() {
            return Err(not_found_error("Mechanic"));
        }

        tx.delete_mechanic(id).await.map_err(conflict_on_integrity(STILL_ASSIGNED))?;
        tx.commit().await.map_err(conflict_on_integrity(STILL_ASSIGNED))?;

        log::info!("🗑️ Mecánico {} eliminado", id);
        Ok(ApiResponse::message("Mechanic deleted successfully"))
    }
}
