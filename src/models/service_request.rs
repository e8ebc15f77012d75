//! Modelo de ServiceRequest
//!
//! Una orden de servicio sobre un vehículo, con su estado y el mecánico asignado.
//! El estado se guarda como texto y la base de datos lo restringe con un CHECK
//! a los mismos tres literales que acepta `ServiceStatus`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Estado de una orden de servicio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[serde(rename = "Pending")]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid service status '{0}'")]
pub struct InvalidServiceStatus(pub String);

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 3] = [
        ServiceStatus::Pending,
        ServiceStatus::InProgress,
        ServiceStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Pending => "Pending",
            ServiceStatus::InProgress => "In Progress",
            ServiceStatus::Completed => "Completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ServiceStatus::Completed)
    }
}

impl Default for ServiceStatus {
    fn default() -> Self {
        ServiceStatus::Pending
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceStatus {
    type Err = InvalidServiceStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ServiceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| InvalidServiceStatus(value.to_string()))
    }
}

impl TryFrom<String> for ServiceStatus {
    type Error = InvalidServiceStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// ServiceRequest - mapea a la tabla service_requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ServiceRequest {
    pub id: i64,
    pub vehicle_id: i64,
    pub service_type: String,
    pub service_date: NaiveDate,
    pub problem_description: String,
    #[sqlx(try_from = "String")]
    pub status: ServiceStatus,
    pub assigned_mechanic_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Datos ya validados para insertar una orden nueva.
/// No lleva estado: toda orden nace en `Pending`.
#[derive(Debug, Clone)]
pub struct NewServiceRequest {
    pub vehicle_id: i64,
    pub service_type: String,
    pub service_date: NaiveDate,
    pub problem_description: String,
    pub assigned_mechanic_id: Option<i64>,
}
