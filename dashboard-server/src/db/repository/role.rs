//! Role Repository

use super::{RepoError, RepoResult};
use shared::models::{Role, RoleCreate, RoleUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>(
        "SELECT id, name, description, created_at FROM roles ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, description, created_at FROM roles WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(role)
}

/// Exact-match lookup. Role names are compared case-sensitively here; only
/// the admin gate compares case-insensitively.
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, description, created_at FROM roles WHERE name = ? LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(role)
}

pub async fn create(pool: &SqlitePool, data: RoleCreate) -> RepoResult<Role> {
    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Role with name '{}' already exists",
            data.name
        )));
    }

    let now = shared::util::now_millis();
    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO roles (name, description, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(now)
    .fetch_one(pool)
    .await;

    let id = match inserted {
        Ok(id) => id,
        // A concurrent writer may have slipped past the existence check
        Err(err) if RepoError::is_unique_violation(&err) => {
            return Err(RepoError::Duplicate(format!(
                "Role with name '{}' already exists",
                data.name
            )));
        }
        Err(err) => return Err(err.into()),
    };

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create role".into()))
}

/// Look-up-or-create by name, idempotent under concurrent registration:
/// a lost insert race falls back to the row the winner created.
pub async fn get_or_create(pool: &SqlitePool, name: &str) -> RepoResult<Role> {
    if let Some(role) = find_by_name(pool, name).await? {
        return Ok(role);
    }

    let now = shared::util::now_millis();
    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO roles (name, description, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(None::<String>)
    .bind(now)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(id) => find_by_id(pool, id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create role".into())),
        Err(err) if RepoError::is_unique_violation(&err) => find_by_name(pool, name)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create role".into())),
        Err(err) => Err(err.into()),
    }
}

pub async fn update(pool: &SqlitePool, id: i64, data: RoleUpdate) -> RepoResult<Role> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Role {id} not found")))?;

    // Check duplicate name if changing
    if let Some(ref new_name) = data.name
        && new_name != &existing.name
        && find_by_name(pool, new_name).await?.is_some()
    {
        return Err(RepoError::Duplicate(format!(
            "Role with name '{new_name}' already exists"
        )));
    }

    sqlx::query(
        "UPDATE roles SET name = COALESCE(?1, name), description = COALESCE(?2, description) WHERE id = ?3",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Role {id} not found")))
}

/// Delete a role. Rejected while any user assignment references it
/// (referential guard, not a cascade); owned section permissions are
/// removed with the role.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Role {id} not found")))?;

    let assigned = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users_roles WHERE role_id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    if assigned > 0 {
        return Err(RepoError::Conflict(format!(
            "Cannot delete role '{}': it is assigned to {} user(s)",
            existing.name, assigned
        )));
    }

    sqlx::query("DELETE FROM roles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}
