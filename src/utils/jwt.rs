//! Utilidades JWT de sesión
//!
//! El token de sesión lleva el id del usuario y su rol. Se entrega como cookie
//! HttpOnly para la UI y se acepta como `Authorization: Bearer` en la API.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::environment::EnvironmentConfig,
    models::user::Role,
    utils::errors::AppError,
};

/// Claims del JWT de sesión
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,  // user_id
    pub role: String, // admin | staff
    pub exp: usize,
    pub iat: usize,
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }
    }
}

/// Generar token de sesión para un usuario
pub fn generate_token(user_id: i64, role: Role, config: &JwtConfig) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.expiration as i64);

    let claims = SessionClaims {
        sub: user_id.to_string(),
        role: role.as_str().to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))
}

/// Verificar y decodificar token de sesión
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<SessionClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<SessionClaims>(token, &decoding_key, &Validation::default())
        .map_err(|_| AppError::Unauthorized("Login required".to_string()))?;

    Ok(token_data.claims)
}

/// Id de usuario contenido en los claims
pub fn user_id_from_claims(claims: &SessionClaims) -> Result<i64, AppError> {
    claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::Unauthorized("Login required".to_string()))
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    #[test]
    fn test_token_carries_user_and_role() {
        let token = generate_token(42, Role::Staff, &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(user_id_from_claims(&claims).unwrap(), 42);
        assert_eq!(Role::from_stored(&claims.role), Role::Staff);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = generate_token(1, Role::Admin, &config()).unwrap();
        let other = JwtConfig {
            secret: "other".to_string(),
            expiration: 3600,
        };
        assert!(matches!(verify_token(&token, &other), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token_from_header("Bearer "), None);
        assert_eq!(extract_token_from_header("Basic xyz"), None);
    }
}
