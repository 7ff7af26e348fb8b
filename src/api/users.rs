use tracing::{error, info};

use crate::{
    auth::password::hash_password,
    db::DbPool,
    error::{AppError, ValidationError},
    model::role::Role,
    utils::username_index::UsernameIndex,
};

/// Inserts a new leader account and records the name in the username index.
pub async fn insert_user(
    username: &str,
    password: &str,
    role: Role,
    pool: &DbPool,
    index: &UsernameIndex,
) -> Result<i64, AppError> {
    if !index.is_available(username, pool).await? {
        return Err(ValidationError::DuplicateUsername.into());
    }

    let hashed = hash_password(password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        AppError::Internal("password hashing failed".to_string())
    })?;

    let result = sqlx::query(
        r#"INSERT INTO users (username, password, role, group_id, sub_group_id) VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(username)
    .bind(hashed)
    .bind(role.name().as_ref())
    .bind(role.group_id())
    .bind(role.sub_group_id())
    .execute(pool)
    .await;

    match result {
        Ok(done) => {
            index.mark_taken(username).await;
            let user_id = done.last_insert_rowid();
            info!(user_id, username, role = %role.name(), "User created");
            Ok(user_id)
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            // lost a race against a concurrent insert
            index.mark_taken(username).await;
            Err(ValidationError::DuplicateUsername.into())
        }
        Err(e) => Err(e.into()),
    }
}
