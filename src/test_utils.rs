use std::net::SocketAddr;
use std::str::FromStr;

use actix_web::test::TestRequest;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::auth::auth::AuthUser;
use crate::config::{AccessScope, AttendancePolicy, Config};
use crate::db::{self, DbPool};
use crate::model::role::Role;

pub const NORTH: i64 = 1;
pub const SOUTH: i64 = 2;
pub const NORTH_A: i64 = 1;
pub const NORTH_B: i64 = 2;
pub const SOUTH_A: i64 = 3;

pub const MANAGER_NAME: &str = "boss";
pub const MANAGER_PASSWORD: &str = "boss-pass";

/// In-memory database with the schema applied, two groups, three sub-groups
/// and a single manager account.
///
/// One connection only: every pooled connection to `sqlite::memory:` would
/// otherwise open its own empty database.
pub async fn setup_test_pool() -> DbPool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to connect to in-memory database");

    db::migrate(&pool).await.expect("Failed to run migrations");

    for name in ["North", "South"] {
        sqlx::query("INSERT INTO groups (name) VALUES (?)")
            .bind(name)
            .execute(&pool)
            .await
            .expect("Failed to seed group");
    }

    for (name, group_id) in [("North-A", NORTH), ("North-B", NORTH), ("South-A", SOUTH)] {
        seed_sub_group(&pool, name, group_id).await;
    }

    db::ensure_manager(&pool, MANAGER_NAME, MANAGER_PASSWORD)
        .await
        .expect("Failed to seed manager");

    pool
}

pub async fn seed_sub_group(pool: &DbPool, name: &str, group_id: i64) -> i64 {
    sqlx::query("INSERT INTO subgroups (name, group_id) VALUES (?, ?)")
        .bind(name)
        .bind(group_id)
        .execute(pool)
        .await
        .expect("Failed to seed sub-group")
        .last_insert_rowid()
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        secret_key: "test-secret".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        session_ttl: 3600,
        rate_login_per_min: 10_000,
        rate_protected_per_min: 10_000,
        access_scope: AccessScope::Scoped,
        attendance_policy: AttendancePolicy::Upsert,
        log_dir: "logs".to_string(),
        bootstrap_manager: None,
    }
}

pub fn manager() -> AuthUser {
    AuthUser {
        user_id: 1,
        username: MANAGER_NAME.to_string(),
        role: Role::Manager,
    }
}

/// Rate limiting keys on the peer address, which test requests lack by default.
pub fn request(req: TestRequest) -> TestRequest {
    req.peer_addr(SocketAddr::from(([127, 0, 0, 1], 40_000)))
}
