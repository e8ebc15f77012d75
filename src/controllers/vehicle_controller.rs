use std::sync::Arc;

use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleCreatedResponse};
use crate::models::vehicle::{NewVehicle, Vehicle};
use crate::repositories::store::GarageStore;
use crate::utils::errors::{conflict_on_integrity, not_found_error, AppError};

const DUPLICATE_NUMBER: &str = "Vehicle number already exists";
const DELETE_BLOCKED: &str = "Cannot delete vehicle because an invoice exists for it";

pub struct VehicleController {
    store: Arc<dyn GarageStore>,
}

impl VehicleController {
    pub fn new(store: Arc<dyn GarageStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleCreatedResponse>, AppError> {
        let new_vehicle = request.into_new_vehicle()?;
        let vehicle = self.insert(new_vehicle).await?;

        Ok(ApiResponse::success_with_message(
            VehicleCreatedResponse {
                id: vehicle.id,
                vehicle_number: vehicle.vehicle_number,
                customer_id: vehicle.customer_id,
            },
            "Vehicle added successfully",
        ))
    }

    /// Alta compartida por API y UI
    pub async fn insert(&self, new_vehicle: NewVehicle) -> Result<Vehicle, AppError> {
        let mut tx = self.store.begin().await?;

        // Verificar que el cliente exista
        if tx.find_customer(new_vehicle.customer_id).await?.is_none() {
            return Err(not_found_error("Customer"));
        }

        // Verificar que la matrícula no exista
        if tx.find_vehicle_by_number(&new_vehicle.vehicle_number).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_NUMBER.to_string()));
        }

        let vehicle = tx
            .insert_vehicle(new_vehicle)
            .await
            .map_err(conflict_on_integrity(DUPLICATE_NUMBER))?;
        tx.commit().await.map_err(conflict_on_integrity(DUPLICATE_NUMBER))?;

        log::info!("🚗 Vehículo {} registrado ({})", vehicle.id, vehicle.vehicle_number);
        Ok(vehicle)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Vehicle, AppError> {
        let mut tx = self.store.begin().await?;
        let vehicle = tx.find_vehicle(id).await?;
        vehicle.ok_or_else(|| not_found_error("Vehicle"))
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        let mut tx = self.store.begin().await?;
        let vehicles = tx.list_vehicles().await?;
        Ok(vehicles)
    }

    pub async fn update(&self, id: i64, request: UpdateVehicleRequest) -> Result<ApiResponse<()>, AppError> {
        let mut tx = self.store.begin().await?;
        let mut vehicle = tx
            .find_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;

        if let Some(number) = request.vehicle_number {
            if let Some(existing) = tx.find_vehicle_by_number(&number).await? {
                if existing.id != vehicle.id {
                    return Err(AppError::Conflict(DUPLICATE_NUMBER.to_string()));
                }
            }
            vehicle.vehicle_number = number;
        }
        if let Some(vehicle_type) = request.vehicle_type {
            vehicle.vehicle_type = vehicle_type;
        }
        if let Some(brand) = request.brand {
            vehicle.brand = brand;
        }
        if let Some(model) = request.model {
            vehicle.model = model;
        }

        tx.update_vehicle(&vehicle)
            .await
            .map_err(conflict_on_integrity(DUPLICATE_NUMBER))?;
        tx.commit().await.map_err(conflict_on_integrity(DUPLICATE_NUMBER))?;

        Ok(ApiResponse::message("Vehicle updated successfully"))
    }

    /// Borra el vehículo y, en cascada, sus órdenes de servicio
    pub async fn delete(&self, id: i64) -> Result<ApiResponse<()>, AppError> {
        let mut tx = self.store.begin().await?;
        if tx.find_vehicle(id).await?.is_none() {
            return Err(not_found_error("Vehicle"));
        }

        tx.delete_vehicle(id).await.map_err(conflict_on_integrity(DELETE_BLOCKED))?;
        tx.commit().await.map_err(conflict_on_integrity(DELETE_BLOCKED))?;

        log::info!("🗑️ Vehículo {} eliminado", id);
        Ok(ApiResponse::message("Vehicle deleted successfully"))
    }
}
