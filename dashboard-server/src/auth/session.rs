//! Session resolution
//!
//! Turns a bearer token into a live [`CurrentUser`] on every request:
//! validate the signature, parse the subject to the principal id, load the
//! user with all role assignments in one fetch, and enforce the
//! active-account policy. A disabled account fails `Forbidden` even when
//! the token itself is still valid.

use shared::models::{Role, UserWithRoles};

use crate::server::ServerState;
use crate::utils::AppError;

/// Current user context injected into request extensions by the
/// authentication middleware.
///
/// Roles are loaded eagerly so permission checks iterate in memory instead
/// of issuing one query per role.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl From<UserWithRoles> for CurrentUser {
    fn from(loaded: UserWithRoles) -> Self {
        Self {
            id: loaded.user.id,
            name: loaded.user.name,
            email: loaded.user.email,
            roles: loaded.roles,
        }
    }
}

impl CurrentUser {
    /// Whether any assigned role is the privileged "admin" role
    /// (case-insensitive name comparison).
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }

    pub fn role_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.roles.iter().map(|role| role.id)
    }
}

/// Resolve a bearer token to a live principal.
///
/// Failure mapping:
/// - token invalid/expired/unparseable subject → 401 (invalid token)
/// - subject does not reference an existing user → 401
/// - account disabled → 403 (the token was valid; the account is not)
pub async fn resolve(state: &ServerState, token: &str) -> Result<CurrentUser, AppError> {
    let claims = state
        .jwt_service
        .validate_token(token)
        .map_err(|_| AppError::InvalidToken)?;

    let user_id: i64 = claims.sub.parse().map_err(|_| AppError::InvalidToken)?;

    let loaded = crate::db::repository::user::find_with_roles(state.pool(), user_id)
        .await?
        .ok_or_else(AppError::unauthorized)?;

    if !loaded.user.is_active {
        return Err(AppError::forbidden("Account is inactive"));
    }

    Ok(CurrentUser::from(loaded))
}
