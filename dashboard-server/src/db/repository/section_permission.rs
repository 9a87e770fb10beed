//! Section Permission Repository

use super::{RepoError, RepoResult};
use shared::models::SectionPermission;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, role_id, section, can_view, can_edit, created_at";

pub async fn find_by_role_and_section(
    pool: &SqlitePool,
    role_id: i64,
    section: &str,
) -> RepoResult<Option<SectionPermission>> {
    let permission = sqlx::query_as::<_, SectionPermission>(&format!(
        "SELECT {COLUMNS} FROM section_permissions WHERE role_id = ? AND section = ?"
    ))
    .bind(role_id)
    .bind(section)
    .fetch_optional(pool)
    .await?;
    Ok(permission)
}

pub async fn list_by_role(pool: &SqlitePool, role_id: i64) -> RepoResult<Vec<SectionPermission>> {
    let permissions = sqlx::query_as::<_, SectionPermission>(&format!(
        "SELECT {COLUMNS} FROM section_permissions WHERE role_id = ? ORDER BY section"
    ))
    .bind(role_id)
    .fetch_all(pool)
    .await?;
    Ok(permissions)
}

/// Upsert the grant for (role_id, section).
///
/// The UNIQUE index on the pair makes this safe under concurrent writers:
/// whoever loses the insert race updates the existing row instead of
/// creating a second one.
pub async fn set(
    pool: &SqlitePool,
    role_id: i64,
    section: &str,
    can_view: bool,
    can_edit: bool,
) -> RepoResult<SectionPermission> {
    if super::role::find_by_id(pool, role_id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Role {role_id} not found")));
    }

    let now = shared::util::now_millis();
    let permission = sqlx::query_as::<_, SectionPermission>(&format!(
        "INSERT INTO section_permissions (role_id, section, can_view, can_edit, created_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(role_id, section)
         DO UPDATE SET can_view = excluded.can_view, can_edit = excluded.can_edit
         RETURNING {COLUMNS}"
    ))
    .bind(role_id)
    .bind(section)
    .bind(can_view)
    .bind(can_edit)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(permission)
}

/// Remove the grant for (role_id, section). Absence is not an error.
pub async fn delete_by_role_and_section(
    pool: &SqlitePool,
    role_id: i64,
    section: &str,
) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM section_permissions WHERE role_id = ? AND section = ?")
        .bind(role_id)
        .bind(section)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
