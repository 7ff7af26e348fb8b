use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::auth::password::hash_password;
use crate::model::role::RoleName;

pub type DbPool = SqlitePool;

pub async fn init_db(database_url: &str) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL: {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    info!("Database schema is up to date");
    Ok(())
}

/// Creates the first manager account unless a manager already exists.
pub async fn ensure_manager(pool: &DbPool, username: &str, password: &str) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE role = ? LIMIT 1)",
    )
    .bind(RoleName::Manager.as_ref())
    .fetch_one(pool)
    .await?;

    if exists {
        return Ok(false);
    }

    let hashed = hash_password(password).map_err(|e| anyhow::anyhow!("{e}"))?;
    sqlx::query("INSERT INTO users (username, password, role) VALUES (?, ?, ?)")
        .bind(username)
        .bind(hashed)
        .bind(RoleName::Manager.as_ref())
        .execute(pool)
        .await
        .context("Failed to seed manager")?;

    info!(username, "Seeded initial manager account");
    Ok(true)
}
