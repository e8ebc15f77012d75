//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::store::GarageStore;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GarageStore>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn GarageStore>, config: EnvironmentConfig) -> Self {
        Self { store, config }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(&self.config)
    }
}
