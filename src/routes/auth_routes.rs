use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;

use crate::controllers::auth_controller::AuthController;
use crate::dto::api_response::{ApiResponse, WithStatus};
use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::middleware::auth::{expired_session_cookie, session_cookie};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::json::ApiJson;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

pub fn auth_controller(state: &AppState) -> AuthController {
    AuthController::new(state.store.clone(), state.jwt_config(), state.config.bcrypt_cost)
}

async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<WithStatus<()>, AppError> {
    auth_controller(&state).register(request).await?;
    Ok(WithStatus(
        StatusCode::CREATED,
        ApiResponse::message("User registered successfully"),
    ))
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), AppError> {
    let (user, token) = auth_controller(&state).login(request).await?;
    let jar = jar.add(session_cookie(token.clone()));

    Ok((
        jar,
        Json(ApiResponse::success_with_message(
            LoginResponse { token, user },
            "Login successful",
        )),
    ))
}

async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<()>>) {
    (
        jar.remove(expired_session_cookie()),
        Json(ApiResponse::message("Logged out successfully")),
    )
}
