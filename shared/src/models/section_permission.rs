//! Section Permission Model

use serde::{Deserialize, Serialize};

/// Per-(role, section) view/edit grant.
///
/// At most one row exists per (role_id, section) pair; writes go through an
/// upsert keyed on that pair. A missing row means "no access", not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SectionPermission {
    pub id: i64,
    pub role_id: i64,
    pub section: String,
    pub can_view: bool,
    pub can_edit: bool,
    pub created_at: i64,
}

/// Set permission payload (upsert by (role_id, section)).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPermissionRequest {
    pub can_view: bool,
    pub can_edit: bool,
}
