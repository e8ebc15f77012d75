//! Registro y login de usuarios del taller
//!
//! El login por email lo usa la API; el login por nombre de usuario, el
//! formulario de la UI. Ambos devuelven el token de sesión.

use std::sync::Arc;

use bcrypt::{hash, verify};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, RegisterRequest};
use crate::models::user::{NewUser, Role, User};
use crate::repositories::store::GarageStore;
use crate::utils::errors::{conflict_on_integrity, AppError};
use crate::utils::jwt::{generate_token, JwtConfig};

const DUPLICATE_EMAIL: &str = "Email already registered";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthController {
    store: Arc<dyn GarageStore>,
    jwt: JwtConfig,
    bcrypt_cost: u32,
}

impl AuthController {
    pub fn new(store: Arc<dyn GarageStore>, jwt: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            store,
            jwt,
            bcrypt_cost,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        request.validate()?;

        let role = request
            .role
            .as_deref()
            .map(Role::from_stored)
            .unwrap_or_default();

        let password_hash = hash(&request.password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))?;

        let mut tx = self.store.begin().await?;
        if tx.find_user_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let user = tx
            .insert_user(NewUser {
                username: request.username,
                email: request.email,
                password_hash,
                role,
            })
            .await
            .map_err(conflict_on_integrity(DUPLICATE_EMAIL))?;
        tx.commit().await.map_err(conflict_on_integrity(DUPLICATE_EMAIL))?;

        log::info!("✅ Usuario {} registrado con rol {}", user.id, user.role);
        Ok(user)
    }

    /// Login por email (API)
    pub async fn login(&self, request: LoginRequest) -> Result<(User, String), AppError> {
        request.validate()?;
        let mut tx = self.store.begin().await?;
        let user = tx.find_user_by_email(&request.email).await?;
        self.issue_session(user, &request.password)
    }

    /// Login por nombre de usuario (formulario de la UI)
    pub async fn login_with_username(&self, username: &str, password: &str) -> Result<(User, String), AppError> {
        let mut tx = self.store.begin().await?;
        let user = tx.find_user_by_username(username).await?;
        self.issue_session(user, password)
    }

    fn issue_session(&self, user: Option<User>, password: &str) -> Result<(User, String), AppError> {
        let user = match user {
            Some(user) if verify(password, &user.password_hash).unwrap_or(false) => user,
            _ => {
                log::warn!("🔐 Credenciales inválidas");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        let token = generate_token(user.id, user.role, &self.jwt)?;
        log::info!("🔐 Sesión iniciada para el usuario {}", user.id);
        Ok((user, token))
    }
}
