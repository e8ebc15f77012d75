//! Ciclo de vida de las órdenes de servicio
//!
//! Dos caminos de escritura conviven:
//!
//! * API JSON (`create`, `update`): sincroniza campos. El alta siempre nace
//!   en `Pending` y no toca la disponibilidad. La actualización solo pasa por
//!   el coordinador si `ApiUpdatePolicy::Coordinated` está activo.
//! * UI (`create_with_assignment`, `reassign`): cada cambio de mecánico o de
//!   estado pasa por `AvailabilityCoordinator`, en la misma transacción.
//!
//! El borrado es común a ambos y nunca modifica disponibilidad.

use std::sync::Arc;

use crate::config::environment::ApiUpdatePolicy;
use crate::models::service_request::{NewServiceRequest, ServiceRequest};
use crate::repositories::store::GarageStore;
use crate::services::availability::{AvailabilityCoordinator, RequestedMechanic};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{parse_service_date, parse_service_status};

pub const MECHANIC_FK_CONFLICT: &str = "Assigned mechanic does not exist";
pub const DELETE_BLOCKED_BY_INVOICE: &str =
    "Cannot delete service request because an invoice exists for this service";
pub const DELETE_FAILED: &str = "Failed to delete service request";

/// Alta de una orden. La fecha llega cruda: se valida después de las
/// referencias a vehículo y mecánico.
#[derive(Debug, Clone)]
pub struct ServiceDraft {
    pub vehicle_id: i64,
    pub service_type: String,
    pub service_date: String,
    pub problem_description: String,
    pub assigned_mechanic_id: Option<i64>,
}

/// Actualización parcial vía API.
///
/// `None` = campo ausente. `Some(None)` = campo presente con `null`.
#[derive(Debug, Clone, Default)]
pub struct ServiceChanges {
    pub status: Option<String>,
    pub problem_description: Option<Option<String>>,
    pub assigned_mechanic_id: Option<Option<i64>>,
}

pub struct ServiceRequestService {
    store: Arc<dyn GarageStore>,
    api_update_policy: ApiUpdatePolicy,
}

impl ServiceRequestService {
    pub fn new(store: Arc<dyn GarageStore>, api_update_policy: ApiUpdatePolicy) -> Self {
        Self {
            store,
            api_update_policy,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<ServiceRequest>> {
        let mut tx = self.store.begin().await?;
        let services = tx.list_services().await?;
        Ok(services)
    }

    pub async fn get(&self, id: i64) -> AppResult<ServiceRequest> {
        let mut tx = self.store.begin().await?;
        let service = tx.find_service(id).await?;
        service.ok_or_else(|| not_found_error("Service request"))
    }

    /// Alta vía API: estado forzado a `Pending`, sin efectos sobre mecánicos
    pub async fn create(&self, draft: ServiceDraft) -> AppResult<ServiceRequest> {
        let mut tx = self.store.begin().await?;

        if tx.find_vehicle(draft.vehicle_id).await?.is_none() {
            return Err(not_found_error("Vehicle"));
        }

        if let Some(mechanic_id) = draft.assigned_mechanic_id {
            if tx.find_mechanic(mechanic_id).await?.is_none() {
                return Err(AppError::NotFound("Assigned mechanic not found".to_string()));
            }
        }

        let service_date = parse_service_date(&draft.service_date)?;

        let service = tx
            .insert_service(NewServiceRequest {
                vehicle_id: draft.vehicle_id,
                service_type: draft.service_type,
                service_date,
                problem_description: draft.problem_description,
                assigned_mechanic_id: draft.assigned_mechanic_id,
            })
            .await?;
        tx.commit().await?;

        log::info!("✅ Orden {} creada para vehículo {}", service.id, service.vehicle_id);
        Ok(service)
    }

    /// Alta desde la UI: el mecánico, si se indica, queda ocupado en la misma transacción
    pub async fn create_with_assignment(&self, draft: ServiceDraft) -> AppResult<ServiceRequest> {
        let mut tx = self.store.begin().await?;

        let acquire = match draft.assigned_mechanic_id {
            Some(id) => {
                let found = AvailabilityCoordinator::resolve(tx.as_mut(), id).await?;
                Some(AvailabilityCoordinator::plan_assignment(RequestedMechanic {
                    id,
                    found: found.as_ref(),
                })?)
            }
            None => None,
        };

        if tx.find_vehicle(draft.vehicle_id).await?.is_none() {
            return Err(not_found_error("Vehicle"));
        }
        let service_date = parse_service_date(&draft.service_date)?;

        let service = tx
            .insert_service(NewServiceRequest {
                vehicle_id: draft.vehicle_id,
                service_type: draft.service_type,
                service_date,
                problem_description: draft.problem_description,
                assigned_mechanic_id: draft.assigned_mechanic_id,
            })
            .await?;

        if let Some(change) = acquire {
            AvailabilityCoordinator::apply(tx.as_mut(), &[change]).await?;
        }
        tx.commit().await?;

        log::info!(
            "✅ Orden {} creada desde la UI (mecánico: {:?})",
            service.id,
            service.assigned_mechanic_id
        );
        Ok(service)
    }

    /// Actualización parcial vía API
    pub async fn update(&self, id: i64, changes: ServiceChanges) -> AppResult<ServiceRequest> {
        let mut tx = self.store.begin().await?;
        let mut service = tx
            .find_service(id)
            .await?
            .ok_or_else(|| not_found_error("Service request"))?;

        let status = changes
            .status
            .as_deref()
            .map(parse_service_status)
            .transpose()?;

        if let Some(description) = changes.problem_description {
            service.problem_description = description.unwrap_or_default();
        }

        match self.api_update_policy {
            ApiUpdatePolicy::Unaware => {
                if let Some(status) = status {
                    service.status = status;
                }
                if let Some(mechanic_id) = changes.assigned_mechanic_id {
                    service.assigned_mechanic_id = mechanic_id;
                }
            }
            ApiUpdatePolicy::Coordinated => {
                let new_status = status.unwrap_or(service.status);
                let new_mechanic_id = changes
                    .assigned_mechanic_id
                    .unwrap_or(service.assigned_mechanic_id);
                AvailabilityCoordinator::reassign(tx.as_mut(), &mut service, new_mechanic_id, new_status)
                    .await?;
            }
        }

        tx.update_service(&service).await.map_err(mechanic_fk_conflict)?;
        tx.commit().await.map_err(mechanic_fk_conflict)?;

        log::info!("🔄 Orden {} actualizada vía API ({})", service.id, service.status);
        Ok(service)
    }

    /// Cambio de estado y/o mecánico desde la UI.
    /// `new_status` ausente conserva el estado actual.
    pub async fn reassign(
        &self,
        id: i64,
        new_mechanic_id: Option<i64>,
        new_status: Option<&str>,
    ) -> AppResult<ServiceRequest> {
        let mut tx = self.store.begin().await?;
        let mut service = tx
            .find_service(id)
            .await?
            .ok_or_else(|| not_found_error("Service request"))?;

        let status = match new_status {
            Some(raw) => parse_service_status(raw)?,
            None => service.status,
        };

        let changes =
            AvailabilityCoordinator::reassign(tx.as_mut(), &mut service, new_mechanic_id, status).await?;
        tx.update_service(&service).await?;
        tx.commit().await?;

        log::info!(
            "🔄 Orden {} -> {} (mecánico: {:?}, cambios de disponibilidad: {})",
            service.id,
            service.status,
            service.assigned_mechanic_id,
            changes.len()
        );
        Ok(service)
    }

    /// Borrar una orden. Una factura existente bloquea el borrado.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        if tx.find_service(id).await?.is_none() {
            return Err(not_found_error("Service request"));
        }

        let deleted = tx.delete_service(id).await;
        let outcome = match deleted {
            Ok(()) => tx.commit().await,
            Err(e) => Err(e),
        };

        outcome.map_err(|e| match e {
            AppError::Integrity(constraint) => {
                log::warn!("⚠️ Borrado de la orden {} bloqueado por {}", id, constraint);
                AppError::Conflict(DELETE_BLOCKED_BY_INVOICE.to_string())
            }
            other => {
                log::error!("❌ Error borrando la orden {}: {}", id, other);
                AppError::Internal(DELETE_FAILED.to_string())
            }
        })?;

        log::info!("🗑️ Orden {} eliminada", id);
        Ok(())
    }
}

fn mechanic_fk_conflict(error: AppError) -> AppError {
    match error {
        AppError::Integrity(_) => AppError::Conflict(MECHANIC_FK_CONFLICT.to_string()),
        other => other,
    }
}
