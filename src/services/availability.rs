//! Coordinador de disponibilidad de mecánicos
//!
//! `Mechanic.is_available` es estado cacheado: no se recalcula a partir de las
//! órdenes, se mantiene a mano. Toda mutación de una orden que deba moverlo
//! pasa por aquí, en la misma transacción que la escritura de la orden.
//!
//! ```text
//! asignar M (M libre)            -> M ocupado
//! reasignar A -> B (B libre)     -> A libre, B ocupado
//! completar con M                -> M libre
//! desasignar sin completar       -> A sigue ocupado (sin liberación)
//! ```
//!
//! La planificación es pura (`plan_*`); `apply` ejecuta el plan sobre un
//! `StoreTx` abierto.

use crate::models::mechanic::Mechanic;
use crate::models::service_request::{ServiceRequest, ServiceStatus};
use crate::repositories::store::StoreTx;
use crate::utils::errors::{AppError, AppResult};

pub const MECHANIC_NOT_AVAILABLE: &str = "Selected mechanic is not available";
pub const INVALID_MECHANIC: &str = "Invalid mechanic selected";

/// Nuevo valor del flag de un mecánico
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityChange {
    pub mechanic_id: i64,
    pub is_available: bool,
}

impl AvailabilityChange {
    pub fn release(mechanic_id: i64) -> Self {
        Self { mechanic_id, is_available: true }
    }

    pub fn acquire(mechanic_id: i64) -> Self {
        Self { mechanic_id, is_available: false }
    }
}

/// Mecánico pedido por el formulario, ya resuelto contra el almacenamiento
#[derive(Debug, Clone, Copy)]
pub struct RequestedMechanic<'a> {
    pub id: i64,
    pub found: Option<&'a Mechanic>,
}

pub struct AvailabilityCoordinator;

impl AvailabilityCoordinator {
    /// Alta de una orden con mecánico: debe existir y estar libre
    pub fn plan_assignment(requested: RequestedMechanic<'_>) -> AppResult<AvailabilityChange> {
        match requested.found {
            Some(mechanic) if mechanic.is_available => Ok(AvailabilityChange::acquire(requested.id)),
            _ => Err(AppError::BadRequest(MECHANIC_NOT_AVAILABLE.to_string())),
        }
    }

    /// Cambio de mecánico y/o estado de una orden existente.
    ///
    /// Los cambios devueltos se aplican en orden; si el mismo mecánico aparece
    /// dos veces, gana el último.
    pub fn plan_reassignment(
        old_mechanic_id: Option<i64>,
        requested: Option<RequestedMechanic<'_>>,
        new_status: ServiceStatus,
    ) -> AppResult<Vec<AvailabilityChange>> {
        let new_mechanic_id = match requested {
            None => None,
            Some(RequestedMechanic { found: None, .. }) => {
                return Err(AppError::BadRequest(INVALID_MECHANIC.to_string()));
            }
            Some(RequestedMechanic { id, found: Some(mechanic) }) => {
                // el mismo mecánico siempre puede conservar su orden
                if old_mechanic_id != Some(id) && !mechanic.is_available {
                    return Err(AppError::BadRequest(MECHANIC_NOT_AVAILABLE.to_string()));
                }
                Some(id)
            }
        };

        let completed = new_status.is_completed();
        let mechanic_changed = matches!(new_mechanic_id, Some(id) if old_mechanic_id != Some(id));
        let mut changes = Vec::with_capacity(2);

        if let Some(old_id) = old_mechanic_id {
            if completed || mechanic_changed {
                changes.push(AvailabilityChange::release(old_id));
            }
        }

        if let Some(new_id) = new_mechanic_id {
            changes.push(AvailabilityChange {
                mechanic_id: new_id,
                is_available: completed,
            });
        }

        Ok(changes)
    }

    /// Resolver el mecánico pedido bloqueando su fila
    pub async fn resolve(tx: &mut dyn StoreTx, mechanic_id: i64) -> AppResult<Option<Mechanic>> {
        tx.lock_mechanic(mechanic_id).await
    }

    /// Aplicar un plan dentro de la transacción abierta
    pub async fn apply(tx: &mut dyn StoreTx, changes: &[AvailabilityChange]) -> AppResult<()> {
        for change in changes {
            log::debug!(
                "🔧 Mecánico {} -> is_available={}",
                change.mechanic_id,
                change.is_available
            );
            tx.set_mechanic_availability(change.mechanic_id, change.is_available)
                .await?;
        }
        Ok(())
    }

    /// Planifica y aplica la reasignación de `service`, dejando en `service`
    /// el nuevo estado y mecánico (sin persistir la orden).
    pub async fn reassign(
        tx: &mut dyn StoreTx,
        service: &mut ServiceRequest,
        new_mechanic_id: Option<i64>,
        new_status: ServiceStatus,
    ) -> AppResult<Vec<AvailabilityChange>> {
        let found = match new_mechanic_id {
            Some(id) => Self::resolve(tx, id).await?,
            None => None,
        };
        let requested = new_mechanic_id.map(|id| RequestedMechanic { id, found: found.as_ref() });

        let changes = Self::plan_reassignment(service.assigned_mechanic_id, requested, new_status)?;
        Self::apply(tx, &changes).await?;

        service.status = new_status;
        service.assigned_mechanic_id = new_mechanic_id;
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn mechanic(id: i64, is_available: bool) -> Mechanic {
        Mechanic {
            id,
            name: format!("Mechanic {}", id),
            phone: format!("555-{:04}", id),
            specialization: None,
            is_available,
            created_at: Utc::now(),
        }
    }

    fn requested(m: &Mechanic) -> Option<RequestedMechanic<'_>> {
        Some(RequestedMechanic { id: m.id, found: Some(m) })
    }

    #[test]
    fn test_assignment_requires_available_mechanic() {
        let free = mechanic(1, true);
        let busy = mechanic(2, false);

        let change = AvailabilityCoordinator::plan_assignment(RequestedMechanic { id: 1, found: Some(&free) }).unwrap();
        assert_eq!(change, AvailabilityChange::acquire(1));

        let err = AvailabilityCoordinator::plan_assignment(RequestedMechanic { id: 2, found: Some(&busy) }).unwrap_err();
        assert_eq!(err.public_message(), MECHANIC_NOT_AVAILABLE);

        let err = AvailabilityCoordinator::plan_assignment(RequestedMechanic { id: 9, found: None }).unwrap_err();
        assert_eq!(err.public_message(), MECHANIC_NOT_AVAILABLE);
    }

    #[test]
    fn test_completing_releases_current_mechanic() {
        let current = mechanic(1, false);
        let changes =
            AvailabilityCoordinator::plan_reassignment(Some(1), requested(&current), ServiceStatus::Completed).unwrap();
        let last = changes.last().unwrap();
        assert_eq!(*last, AvailabilityChange::release(1));
    }

    #[test]
    fn test_reassignment_swaps_flags() {
        let b = mechanic(2, true);
        let changes =
            AvailabilityCoordinator::plan_reassignment(Some(1), requested(&b), ServiceStatus::InProgress).unwrap();
        assert_eq!(
            changes,
            vec![AvailabilityChange::release(1), AvailabilityChange::acquire(2)]
        );
    }

    #[test]
    fn test_reassignment_on_completed_frees_both() {
        let b = mechanic(2, true);
        let changes =
            AvailabilityCoordinator::plan_reassignment(Some(1), requested(&b), ServiceStatus::Completed).unwrap();
        assert!(changes.iter().all(|c| c.is_available));
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_same_mechanic_ignores_own_flag() {
        let same = mechanic(1, false);
        let changes =
            AvailabilityCoordinator::plan_reassignment(Some(1), requested(&same), ServiceStatus::InProgress).unwrap();
        assert_eq!(changes, vec![AvailabilityChange::acquire(1)]);
    }

    #[test]
    fn test_busy_new_mechanic_is_rejected() {
        let busy = mechanic(2, false);
        let err =
            AvailabilityCoordinator::plan_reassignment(Some(1), requested(&busy), ServiceStatus::Pending).unwrap_err();
        assert_eq!(err.public_message(), MECHANIC_NOT_AVAILABLE);
    }

    #[test]
    fn test_unknown_new_mechanic_is_rejected() {
        let err = AvailabilityCoordinator::plan_reassignment(
            None,
            Some(RequestedMechanic { id: 77, found: None }),
            ServiceStatus::Pending,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg == INVALID_MECHANIC));
    }

    #[test]
    fn test_unassign_without_completion_keeps_old_mechanic_busy() {
        let changes = AvailabilityCoordinator::plan_reassignment(Some(1), None, ServiceStatus::InProgress).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_unassign_with_completion_releases_old_mechanic() {
        let changes = AvailabilityCoordinator::plan_reassignment(Some(1), None, ServiceStatus::Completed).unwrap();
        assert_eq!(changes, vec![AvailabilityChange::release(1)]);
    }
}
