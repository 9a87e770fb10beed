//! Section permission resolution
//!
//! Per-(role, section) view/edit grants with implicit deny: a role without
//! a permission row for a section has no access to it, and a principal with
//! no roles is denied everywhere. Roles are additive — the decision is the
//! logical OR across all assigned roles, evaluated fresh on every request.

use std::fmt;

use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, section_permission};
use crate::auth::session::CurrentUser;
use crate::utils::AppError;

/// Action on a section. Anything other than the two literals is a
/// validation error, not a deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionAction {
    View,
    Edit,
}

impl PermissionAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flag of the (role, section) row for the given action; `false` when no
/// row exists.
pub async fn check(
    pool: &SqlitePool,
    role_id: i64,
    section: &str,
    action: PermissionAction,
) -> RepoResult<bool> {
    let permission = section_permission::find_by_role_and_section(pool, role_id, section).await?;

    Ok(match permission {
        Some(p) => match action {
            PermissionAction::View => p.can_view,
            PermissionAction::Edit => p.can_edit,
        },
        None => false,
    })
}

/// Enforcement point: may `user` perform `action` on `section`?
///
/// Denies with 403 naming the section and action; grants as soon as any
/// assigned role grants.
pub async fn authorize(
    pool: &SqlitePool,
    user: &CurrentUser,
    section: &str,
    action: PermissionAction,
) -> Result<(), AppError> {
    if user.roles.is_empty() {
        return Err(AppError::forbidden(format!(
            "Access denied: No permission to {action} section '{section}'. User has no roles."
        )));
    }

    for role_id in user.role_ids() {
        if check(pool, role_id, section, action).await? {
            return Ok(());
        }
    }

    Err(AppError::forbidden(format!(
        "Access denied: No permission to {action} section '{section}'"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::role::tests::test_pool;
    use crate::db::repository::{role, section_permission};
    use shared::models::Role;

    fn principal(roles: Vec<Role>) -> CurrentUser {
        CurrentUser {
            id: 1,
            name: "Jane".into(),
            email: "jane@example.com".into(),
            roles,
        }
    }

    #[test]
    fn action_parsing_accepts_only_the_two_literals() {
        assert_eq!(PermissionAction::parse("view"), Some(PermissionAction::View));
        assert_eq!(PermissionAction::parse("edit"), Some(PermissionAction::Edit));
        assert_eq!(PermissionAction::parse("delete"), None);
        assert_eq!(PermissionAction::parse("View"), None);
        assert_eq!(PermissionAction::parse(""), None);
    }

    #[tokio::test]
    async fn check_unknown_section_is_false_not_an_error() {
        let pool = test_pool().await;
        let viewer = role::get_or_create(&pool, "viewer").await.unwrap();

        let granted = check(&pool, viewer.id, "nonexistent_section", PermissionAction::View)
            .await
            .unwrap();
        assert!(!granted);
    }

    #[tokio::test]
    async fn check_respects_per_action_flags() {
        let pool = test_pool().await;
        let viewer = role::get_or_create(&pool, "viewer").await.unwrap();
        section_permission::set(&pool, viewer.id, "dashboard", true, false)
            .await
            .unwrap();

        assert!(check(&pool, viewer.id, "dashboard", PermissionAction::View).await.unwrap());
        assert!(!check(&pool, viewer.id, "dashboard", PermissionAction::Edit).await.unwrap());
    }

    #[tokio::test]
    async fn principal_without_roles_is_denied() {
        let pool = test_pool().await;

        let err = authorize(&pool, &principal(vec![]), "dashboard", PermissionAction::View)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn any_granting_role_is_enough() {
        let pool = test_pool().await;
        let first = role::get_or_create(&pool, "staff").await.unwrap();
        let second = role::get_or_create(&pool, "analyst").await.unwrap();

        // Only the second role grants view on the dashboard
        section_permission::set(&pool, second.id, "dashboard", true, false)
            .await
            .unwrap();

        let user = principal(vec![first.clone(), second.clone()]);
        authorize(&pool, &user, "dashboard", PermissionAction::View)
            .await
            .unwrap();

        // Neither role grants edit
        let err = authorize(&pool, &user, "dashboard", PermissionAction::Edit)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
