//! User Repository

use super::{RepoError, RepoResult};
use crate::auth::password;
use shared::models::{Role, User, UserCreate, UserRole, UserUpdate, UserWithRoles};
use sqlx::SqlitePool;

const USER_COLUMNS: &str =
    "id, name, email, hashed_password, is_active, is_verified, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY email"
    ))
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Exact email match, case-sensitive as persisted.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ? LIMIT 1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Create a new user. The plaintext password is hashed here (Argon2 with a
/// per-record salt) and never stored.
pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    if find_by_email(pool, &data.email).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "User with email {} already exists",
            data.email
        )));
    }

    let hashed_password = password::hash_password(&data.password)
        .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

    let now = shared::util::now_millis();
    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (name, email, hashed_password, is_active, is_verified, created_at, updated_at)
         VALUES (?, ?, ?, 1, 0, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&hashed_password)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await;

    let id = match inserted {
        Ok(id) => id,
        // The UNIQUE index closes the race the existence check leaves open
        Err(err) if RepoError::is_unique_violation(&err) => {
            return Err(RepoError::Duplicate(format!(
                "User with email {} already exists",
                data.email
            )));
        }
        Err(err) => return Err(err.into()),
    };

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: UserUpdate) -> RepoResult<User> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))?;

    // Check email uniqueness if changing
    if let Some(ref new_email) = data.email
        && new_email != &existing.email
        && find_by_email(pool, new_email).await?.is_some()
    {
        return Err(RepoError::Duplicate(format!(
            "User with email {new_email} already exists"
        )));
    }

    let hashed_password = match data.password {
        Some(ref plaintext) => Some(
            password::hash_password(plaintext)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?,
        ),
        None => None,
    };

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE users SET
            name = COALESCE(?1, name),
            email = COALESCE(?2, email),
            hashed_password = COALESCE(?3, hashed_password),
            is_active = COALESCE(?4, is_active),
            is_verified = COALESCE(?5, is_verified),
            updated_at = ?6
         WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&hashed_password)
    .bind(data.is_active)
    .bind(data.is_verified)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

/// Hard delete a user. Assignments are removed first in the same
/// transaction so the join table never dangles.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    if find_by_id(pool, id).await?.is_none() {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM users_roles WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(true)
}

/// Load a user together with all assigned roles in one logical fetch.
///
/// The session middleware calls this on every request; the JOIN keeps role
/// resolution at one round trip instead of one per assignment.
pub async fn find_with_roles(pool: &SqlitePool, id: i64) -> RepoResult<Option<UserWithRoles>> {
    let Some(user) = find_by_id(pool, id).await? else {
        return Ok(None);
    };

    let roles = roles_of(pool, id).await?;
    Ok(Some(UserWithRoles { user, roles }))
}

/// All roles assigned to a user.
pub async fn roles_of(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>(
        "SELECT r.id, r.name, r.description, r.created_at
         FROM roles r
         JOIN users_roles ur ON ur.role_id = r.id
         WHERE ur.user_id = ?
         ORDER BY r.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

/// Assign a role to a user. Double assignment is a conflict, enforced by
/// the composite primary key.
pub async fn assign_role(pool: &SqlitePool, user_id: i64, role_id: i64) -> RepoResult<UserRole> {
    if find_by_id(pool, user_id).await?.is_none() {
        return Err(RepoError::NotFound(format!("User {user_id} not found")));
    }
    if super::role::find_by_id(pool, role_id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Role {role_id} not found")));
    }

    let now = shared::util::now_millis();
    let result = sqlx::query(
        "INSERT INTO users_roles (user_id, role_id, assigned_at) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(role_id)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(UserRole {
            user_id,
            role_id,
            assigned_at: now,
        }),
        Err(err) if RepoError::is_unique_violation(&err) => Err(RepoError::Duplicate(format!(
            "Role {role_id} already assigned to user {user_id}"
        ))),
        Err(err) => Err(err.into()),
    }
}

pub async fn remove_role(pool: &SqlitePool, user_id: i64, role_id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM users_roles WHERE user_id = ? AND role_id = ?")
        .bind(user_id)
        .bind(role_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::super::role::tests::test_pool;
    use super::*;
    use shared::models::RoleCreate;

    fn user_payload(email: &str) -> UserCreate {
        UserCreate {
            name: "Jane".into(),
            email: email.into(),
            password: "correct horse battery staple".into(),
        }
    }

    #[tokio::test]
    async fn create_hashes_password_with_unique_salt() {
        let pool = test_pool().await;

        let first = create(&pool, user_payload("jane@example.com")).await.unwrap();
        let second = create(&pool, user_payload("john@example.com")).await.unwrap();

        // Same plaintext, different stored hashes (per-record salt)
        assert_ne!(first.hashed_password, second.hashed_password);
        assert!(password::verify_password("correct horse battery staple", &first.hashed_password).unwrap());
        assert!(!password::verify_password("wrong", &first.hashed_password).unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let pool = test_pool().await;

        create(&pool, user_payload("jane@example.com")).await.unwrap();
        let err = create(&pool, user_payload("jane@example.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn assign_and_remove_role() {
        let pool = test_pool().await;

        let user = create(&pool, user_payload("jane@example.com")).await.unwrap();
        let role = super::super::role::create(
            &pool,
            RoleCreate { name: "analyst".into(), description: None },
        )
        .await
        .unwrap();

        assign_role(&pool, user.id, role.id).await.unwrap();

        // Second assignment of the same pair conflicts
        let err = assign_role(&pool, user.id, role.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let loaded = find_with_roles(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(loaded.roles.len(), 1);
        assert_eq!(loaded.roles[0].name, "analyst");

        assert!(remove_role(&pool, user.id, role.id).await.unwrap());
        assert!(!remove_role(&pool, user.id, role.id).await.unwrap());
    }

    #[tokio::test]
    async fn assign_role_requires_existing_rows() {
        let pool = test_pool().await;

        let user = create(&pool, user_payload("jane@example.com")).await.unwrap();
        let err = assign_role(&pool, user.id, 999).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        let err = assign_role(&pool, 999, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_assignments_first() {
        let pool = test_pool().await;

        let user = create(&pool, user_payload("jane@example.com")).await.unwrap();
        let role = super::super::role::get_or_create(&pool, "user").await.unwrap();
        assign_role(&pool, user.id, role.id).await.unwrap();

        assert!(delete(&pool, user.id).await.unwrap());

        let orphaned = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users_roles WHERE user_id = ?",
        )
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(orphaned, 0);
    }

    #[tokio::test]
    async fn update_toggles_active_flag() {
        let pool = test_pool().await;

        let user = create(&pool, user_payload("jane@example.com")).await.unwrap();
        assert!(user.is_active);

        let updated = update(
            &pool,
            user.id,
            UserUpdate {
                name: None,
                email: None,
                password: None,
                is_active: Some(false),
                is_verified: None,
            },
        )
        .await
        .unwrap();
        assert!(!updated.is_active);
    }
}
