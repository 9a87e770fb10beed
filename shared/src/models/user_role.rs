//! User-Role Assignment Model

use serde::{Deserialize, Serialize};

/// Assignment row of the `users_roles` join table.
///
/// Composite key (user_id, role_id); a pair can be assigned at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserRole {
    pub user_id: i64,
    pub role_id: i64,
    pub assigned_at: i64,
}
