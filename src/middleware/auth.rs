//! Middleware de autenticación y roles
//!
//! La sesión es un JWT que viaja en la cookie `garage_session` (UI) o en
//! `Authorization: Bearer` (API). El middleware resuelve un `Principal` por
//! request y lo inyecta en las extensions; no hay estado de sesión global.
//!
//! Cada capa existe en dos sabores: la de API responde con el sobre JSON
//! (401/403) y la de UI redirige con un mensaje flash.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    models::user::Role,
    state::AppState,
    ui::flash::redirect_with_flash,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, user_id_from_claims, verify_token},
    },
};

pub const SESSION_COOKIE: &str = "garage_session";

const LOGIN_REQUIRED: &str = "Login required";

/// Usuario autenticado de la request actual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.to_string()))
    }
}

/// Roles admitidos por una ruta
#[derive(Debug, Clone, Copy)]
pub struct RolePolicy(pub &'static [Role]);

impl RolePolicy {
    pub const ADMIN: RolePolicy = RolePolicy(&[Role::Admin]);
    pub const STAFF: RolePolicy = RolePolicy(&[Role::Admin, Role::Staff]);

    pub fn allows(&self, role: Role) -> bool {
        self.0.contains(&role)
    }
}

/// Cookie de sesión HttpOnly
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie vacía para cerrar la sesión
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_token_from_header)
        .map(str::to_string);

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// Resuelve el usuario de la sesión. El rol se toma del usuario almacenado,
/// no del token.
pub async fn resolve_principal(state: &AppState, headers: &HeaderMap) -> Result<Principal, AppError> {
    let token = session_token(headers).ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.to_string()))?;
    let claims = verify_token(&token, &state.jwt_config())?;
    let user_id = user_id_from_claims(&claims)?;

    let mut tx = state.store.begin().await?;
    let user = tx
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.to_string()))?;

    Ok(Principal {
        user_id: user.id,
        role: user.role,
    })
}

/// API: exige sesión válida (401 si no la hay)
pub async fn require_login(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = resolve_principal(&state, request.headers()).await?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// API: exige un rol de la política (403 si no lo tiene).
/// Debe ir dentro de `require_login`.
pub async fn require_role(
    State(policy): State<RolePolicy>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .copied()
        .ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.to_string()))?;

    if !policy.allows(principal.role) {
        tracing::warn!("🚫 Usuario {} sin permiso ({})", principal.user_id, principal.role);
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}

/// UI: sin sesión redirige a /login
pub async fn ui_require_login(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match resolve_principal(&state, request.headers()).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(AppError::Unauthorized(_)) => redirect_with_flash("/login", "Please login first").into_response(),
        Err(other) => {
            tracing::error!("❌ Error resolviendo la sesión: {}", other);
            redirect_with_flash("/login", "Please login first").into_response()
        }
    }
}

/// UI: rol no admitido redirige al panel
pub async fn ui_require_role(State(policy): State<RolePolicy>, request: Request, next: Next) -> Response {
    let allowed = request
        .extensions()
        .get::<Principal>()
        .map(|principal| policy.allows(principal.role));

    match allowed {
        Some(true) => next.run(request).await,
        Some(false) => redirect_with_flash("/", "Access denied").into_response(),
        None => redirect_with_flash("/login", "Please login first").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_role_policy() {
        assert!(RolePolicy::ADMIN.allows(Role::Admin));
        assert!(!RolePolicy::ADMIN.allows(Role::Staff));
        assert!(RolePolicy::STAFF.allows(Role::Staff));
    }

    #[test]
    fn test_session_token_prefers_bearer_then_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("garage_session=from-cookie"));
        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(session_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_session_cookie_is_http_only() {
        let cookie = session_cookie("abc".to_string());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
