//! Authentication Handlers
//!
//! Login, registration, and current-user lookup.

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::models::{Role, UserCreate, UserResponse};

use crate::auth::{CurrentUser, password};
use crate::db::repository::{role, user};
use crate::server::ServerState;
use crate::utils::AppError;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

/// Login/registration response with the session token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

impl LoginResponse {
    fn bearer(access_token: String, user: UserResponse) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

/// Login handler
///
/// Authenticates email + password and returns a signed session token.
/// Unknown email and wrong password fail with one identical message so the
/// response never reveals whether an email is registered.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let found = user::find_by_email(state.pool(), &req.email).await?;

    // Fixed delay to prevent timing attacks (before acting on the result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let Some(found) = found else {
        tracing::warn!(email = %req.email, "Login failed - user not found");
        return Err(AppError::invalid_credentials());
    };

    let password_valid = password::verify_password(&req.password, &found.hashed_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        tracing::warn!(email = %req.email, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    // Correct password, disabled account: still no token
    if !found.is_active {
        tracing::warn!(email = %req.email, "Login failed - account inactive");
        return Err(AppError::inactive_account());
    }

    let token = state
        .jwt_service
        .generate_token(found.id, &found.email)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = found.id, email = %found.email, "User logged in successfully");

    Ok(Json(LoginResponse::bearer(token, UserResponse::from(&found))))
}

/// Registration handler
///
/// Creates the user, assigns the default "user" role (created on first use)
/// and issues a token exactly as login does, so registration always yields
/// an immediately usable session.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = user::create(
        state.pool(),
        UserCreate {
            name: req.name,
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    let default_role = role::get_or_create(state.pool(), Role::DEFAULT).await?;
    user::assign_role(state.pool(), created.id, default_role.id).await?;

    let token = state
        .jwt_service
        .generate_token(created.id, &created.email)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = created.id, email = %created.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse::bearer(token, UserResponse::from(&created))),
    ))
}

/// Current user info
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let fresh = user::find_by_id(state.pool(), current.id)
        .await?
        .ok_or_else(AppError::unauthorized)?;
    Ok(Json(UserResponse::from(&fresh)))
}
