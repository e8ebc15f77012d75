//! Extractor de JSON con errores en el sobre de la API
//!
//! Un cuerpo ausente, malformado o vacío (`{}`, `[]`, `null`, `""`, `0`,
//! `false`) responde 400 "JSON body required" en lugar del rechazo por
//! defecto de axum.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::utils::errors::AppError;

pub struct ApiJson<T>(pub T);

fn body_required() -> AppError {
    AppError::BadRequest("JSON body required".to_string())
}

/// Cuerpo sin contenido útil
fn is_empty_body(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("JSON rechazado: {}", rejection);
            body_required()
        })?;

        if is_empty_body(&value) {
            return Err(body_required());
        }

        serde_json::from_value(value).map(ApiJson).map_err(|e| {
            tracing::debug!("JSON con forma inesperada: {}", e);
            body_required()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_bodies() {
        assert!(is_empty_body(&json!({})));
        assert!(is_empty_body(&json!([])));
        assert!(is_empty_body(&json!(null)));
        assert!(is_empty_body(&json!("")));
        assert!(!is_empty_body(&json!({ "status": "Completed" })));
        assert!(!is_empty_body(&json!({ "problem_description": null })));
    }
}
