//! Modelo de Vehicle
//!
//! Mapea a la tabla vehicles. Cada vehículo pertenece a un cliente
//! (ON DELETE CASCADE) y su matrícula es única en todo el taller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub customer_id: i64,
    pub vehicle_number: String,
    pub vehicle_type: String,
    pub brand: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

/// Datos para insertar un vehículo nuevo
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub customer_id: i64,
    pub vehicle_number: String,
    pub vehicle_type: String,
    pub brand: String,
    pub model: String,
}
