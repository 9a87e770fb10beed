//! Role Model

use serde::{Deserialize, Serialize};

/// Role entity (RBAC role)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,
}

impl Role {
    /// The privileged role name. Comparison is case-insensitive everywhere
    /// this name is checked.
    pub const ADMIN: &'static str = "admin";

    /// Role assigned to every freshly registered user.
    pub const DEFAULT: &'static str = "user";

    pub fn is_admin(&self) -> bool {
        self.name.eq_ignore_ascii_case(Self::ADMIN)
    }
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreate {
    pub name: String,
    pub description: Option<String>,
}

/// Update role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}
