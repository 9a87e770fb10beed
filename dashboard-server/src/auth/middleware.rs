//! Authentication Middleware
//!
//! Axum middleware for session resolution and the coarse admin gate.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService, session};
use crate::security_log;
use crate::server::ServerState;
use crate::utils::AppError;

/// Require authentication middleware
///
/// Extracts the bearer token from the `Authorization` header, resolves it
/// to a live principal (fresh DB load with roles, active-account check),
/// and injects [`CurrentUser`] into the request extensions.
///
/// Skipped for:
/// - `OPTIONS` requests (CORS preflight)
/// - non-`/api/` paths (they 404 normally)
/// - the public auth and health endpoints
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let is_public_api_route = path == "/api/v1/auth/login"
        || path == "/api/v1/auth/register"
        || path == "/api/v1/health";
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => {
            JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?
        }
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match session::resolve(&state, token).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            Err(e)
        }
    }
}

/// Require admin role middleware
///
/// Coarse gate in front of the administrative CRUD surface; checked before
/// any section permission. 403 unless some assigned role is named "admin"
/// (case-insensitive).
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            email = user.email.clone()
        );
        return Err(AppError::forbidden("Admin access required"));
    }

    Ok(next.run(req).await)
}
