//! Modelo de Mechanic

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Mechanic - mapea a la tabla mechanics.
///
/// `is_available` es un valor cacheado: debe ser `false` mientras el mecánico
/// sea el asignado de una orden no completada. Solo el coordinador de
/// disponibilidad lo mantiene en sincronía con las órdenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Mechanic {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub specialization: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMechanic {
    pub name: String,
    pub phone: String,
    pub specialization: Option<String>,
    pub is_available: bool,
}
