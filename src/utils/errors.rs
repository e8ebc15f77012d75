//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP con el sobre `{success, message, data}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::dto::api_response::ApiResponse;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Violación de una restricción de almacenamiento (unique, foreign key, check).
    /// Los servicios la traducen a un `Conflict` con mensaje de dominio.
    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Código HTTP asociado al error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Integrity(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Mensaje visible para el usuario (API y flash de la UI).
    /// Los errores internos nunca exponen el detalle de la base de datos.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "An error occurred while accessing the database".to_string(),
            AppError::Validation(_) => "The provided data is invalid".to_string(),
            AppError::Integrity(_) => "The operation violates a data constraint".to_string(),
            AppError::Internal(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Database(e) => tracing::error!("❌ Database error: {}", e),
            AppError::Internal(msg) => tracing::error!("❌ Internal error: {}", msg),
            AppError::Integrity(constraint) => tracing::warn!("⚠️ Integrity violation: {}", constraint),
            other => tracing::debug!("Request rejected: {}", other),
        }

        let body: ApiResponse<()> = ApiResponse::error(self.public_message());
        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Traduce errores de sqlx: las violaciones de restricciones pasan a `Integrity`
pub fn map_db_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation()
            || db_error.is_foreign_key_violation()
            || db_error.is_check_violation()
        {
            let constraint = db_error
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| db_error.message().to_string());
            return AppError::Integrity(constraint);
        }
    }
    AppError::Database(error)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} not found", resource))
}

/// Traduce una violación de restricción a un `Conflict` con mensaje de dominio.
/// Uso: `.map_err(conflict_on_integrity("Vehicle number already exists"))`
pub fn conflict_on_integrity(message: &'static str) -> impl Fn(AppError) -> AppError {
    move |error| match error {
        AppError::Integrity(constraint) => {
            tracing::debug!("Integrity violation {} -> conflict", constraint);
            AppError::Conflict(message.to_string())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(not_found_error("Vehicle").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Integrity("fk".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(not_found_error("Vehicle").public_message(), "Vehicle not found");
    }

    #[test]
    fn test_conflict_on_integrity() {
        let translate = conflict_on_integrity("Vehicle number already exists");
        let err = translate(AppError::Integrity("vehicles_vehicle_number_key".into()));
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Vehicle number already exists"));
        assert!(matches!(translate(not_found_error("Vehicle")), AppError::NotFound(_)));
    }

    #[test]
    fn test_database_error_is_not_leaked() {
        let error = AppError::Database(sqlx::Error::RowNotFound);
        assert!(!error.public_message().contains("RowNotFound"));
    }
}
