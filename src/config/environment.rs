//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Todas las variables tienen un valor por defecto salvo `JWT_SECRET` en producción.

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

/// Backend de almacenamiento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("STORAGE_BACKEND desconocido: {}", other)),
        }
    }
}

/// Qué hace el endpoint JSON `PUT /services/:id` con la disponibilidad de mecánicos.
///
/// `Unaware` conserva el comportamiento histórico: la API solo sincroniza campos
/// y nunca toca `is_available`. `Coordinated` hace pasar la API por el mismo
/// coordinador que los formularios de la UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiUpdatePolicy {
    #[default]
    Unaware,
    Coordinated,
}

impl FromStr for ApiUpdatePolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unaware" => Ok(ApiUpdatePolicy::Unaware),
            "coordinated" => Ok(ApiUpdatePolicy::Coordinated),
            other => Err(anyhow!("API_UPDATE_POLICY desconocido: {}", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    pub storage_backend: StorageBackend,
    pub api_update_policy: ApiUpdatePolicy,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 5000,
            host: "0.0.0.0".to_string(),
            jwt_secret: "dev-secret-key".to_string(),
            jwt_expiration: 86400,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cors_origins: Vec::new(),
            storage_backend: StorageBackend::Postgres,
            api_update_policy: ApiUpdatePolicy::Unaware,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{} inválido ({}): {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

impl EnvironmentConfig {
    /// Cargar configuración desde variables de entorno
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if environment == "production" => {
                return Err(anyhow!("JWT_SECRET must be set in production"));
            }
            Err(_) => defaults.jwt_secret,
        };

        Ok(Self {
            port: parse_var("PORT", defaults.port).context("PORT")?,
            host: env::var("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration: parse_var("JWT_EXPIRATION", defaults.jwt_expiration)?,
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            storage_backend: parse_var("STORAGE_BACKEND", defaults.storage_backend)?,
            api_update_policy: parse_var("API_UPDATE_POLICY", defaults.api_update_policy)?,
            environment,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!("postgres".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert_eq!("Memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_api_update_policy_parse() {
        assert_eq!("unaware".parse::<ApiUpdatePolicy>().unwrap(), ApiUpdatePolicy::Unaware);
        assert_eq!(
            "coordinated".parse::<ApiUpdatePolicy>().unwrap(),
            ApiUpdatePolicy::Coordinated
        );
        assert!("sometimes".parse::<ApiUpdatePolicy>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = EnvironmentConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "0.0.0.0:5000");
        assert_eq!(config.api_update_policy, ApiUpdatePolicy::Unaware);
    }
}
