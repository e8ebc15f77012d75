//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos de entrada (JSON o formularios).

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

use crate::models::service_request::ServiceStatus;
use crate::utils::errors::{AppError, AppResult};

pub const SERVICE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validar y convertir string a fecha `YYYY-MM-DD`
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), SERVICE_DATE_FORMAT).map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Fecha de servicio o BadRequest
pub fn parse_service_date(value: &str) -> AppResult<NaiveDate> {
    validate_date(value).map_err(|_| AppError::BadRequest("service_date must be YYYY-MM-DD".to_string()))
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en una lista de valores permitidos
pub fn validate_enum<T: FromStr>(value: &str) -> Result<T, ValidationError> {
    value.parse::<T>().map_err(|_| {
        let mut error = ValidationError::new("enum");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Estado de servicio o BadRequest "Invalid service status"
pub fn parse_service_status(value: &str) -> AppResult<ServiceStatus> {
    validate_enum::<ServiceStatus>(value)
        .map_err(|_| AppError::BadRequest("Invalid service status".to_string()))
}

/// Importe estrictamente positivo
pub fn parse_positive_amount(value: &str) -> AppResult<Decimal> {
    Decimal::from_str(value.trim())
        .ok()
        .filter(|amount| *amount > Decimal::ZERO)
        .ok_or_else(|| AppError::BadRequest("Amount must be a positive number".to_string()))
}

/// Id opcional de un formulario: vacío significa "sin valor"
pub fn parse_optional_id(value: Option<&str>, field: &str) -> AppResult<Option<i64>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{} must be a number", field))),
    }
}

/// Distingue "campo ausente" (`None`) de "campo presente con null" (`Some(None)`).
/// Usar con `#[serde(default, deserialize_with = "present")]`.
pub fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Checkbox HTML: presente y distinto de vacío
pub fn checkbox_checked(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_date() {
        let date = parse_service_date("2024-03-15").unwrap();
        assert_eq!(date.format(SERVICE_DATE_FORMAT).to_string(), "2024-03-15");
        assert!(parse_service_date("15/03/2024").is_err());
        assert!(parse_service_date("2024-02-30").is_err());
        assert!(parse_service_date("").is_err());
    }

    #[test]
    fn test_parse_service_status() {
        assert_eq!(parse_service_status("In Progress").unwrap(), ServiceStatus::InProgress);
        let err = parse_service_status("Cancelled").unwrap_err();
        assert_eq!(err.public_message(), "Invalid service status");
    }

    #[test]
    fn test_parse_positive_amount() {
        assert_eq!(parse_positive_amount("150.50").unwrap(), Decimal::new(15050, 2));
        assert!(parse_positive_amount("0").is_err());
        assert!(parse_positive_amount("-3").is_err());
        assert!(parse_positive_amount("abc").is_err());
    }

    #[test]
    fn test_parse_optional_id() {
        assert_eq!(parse_optional_id(None, "mechanic_id").unwrap(), None);
        assert_eq!(parse_optional_id(Some(""), "mechanic_id").unwrap(), None);
        assert_eq!(parse_optional_id(Some(" 7 "), "mechanic_id").unwrap(), Some(7));
        assert!(parse_optional_id(Some("x"), "mechanic_id").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("brakes").is_ok());
    }

    #[test]
    fn test_checkbox_checked() {
        assert!(checkbox_checked(Some("on")));
        assert!(!checkbox_checked(Some("")));
        assert!(!checkbox_checked(None));
    }
}
