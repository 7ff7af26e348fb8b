use crate::{
    api::{
        employee::employees_of,
        group_leader::{find_group, list_groups},
        sub_group_leader::{find_sub_group, sub_groups_of},
    },
    auth::{
        auth::AuthUser,
        password::{verify_dummy, verify_password},
        session::{SESSION_COOKIE, issue_session_token},
    },
    config::Config,
    db::DbPool,
    error::{AppError, AuthError, required, required_secret},
    model::{role::Role, user::User},
    models::LoginReqDto,
};
use actix_web::{
    HttpResponse, Responder,
    cookie::{Cookie, SameSite, time::Duration},
    http::header,
    web,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// Verifies credentials and returns the session bundle of the user.
///
/// Unknown usernames and wrong passwords fail identically.
pub async fn authenticate(
    username: &str,
    password: &str,
    pool: &DbPool,
) -> Result<AuthUser, AppError> {
    let db_user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, role, group_id, sub_group_id
        FROM users
        WHERE username = ? COLLATE BINARY
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    let db_user = match db_user {
        Some(user) => user,
        None => {
            debug!("Invalid credentials: user not found");
            verify_dummy(password);
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    if let Err(e) = verify_password(password, &db_user.password) {
        debug!(error = %e, "Invalid credentials: password mismatch");
        return Err(AuthError::InvalidCredentials.into());
    }

    let role = db_user.role().ok_or_else(|| {
        error!(user_id = db_user.id, role = %db_user.role, "Stored user has an inconsistent role");
        AppError::Internal("inconsistent user role".to_string())
    })?;

    Ok(AuthUser {
        user_id: db_user.id,
        username: db_user.username,
        role,
    })
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    #[schema(example = "group_leader")]
    pub role: String,
    pub redirect: String,
}

pub async fn home() -> impl Responder {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .finish()
}

/// Describes the credential form
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Login form fields", body = Object, example = json!({
        "fields": ["username", "password"], "action": "/login"
    }))),
    tag = "Auth"
)]
pub async fn login_form() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "fields": ["username", "password"],
        "action": "/login"
    }))
}

/// Log in and start a session
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Session started, cookie set", body = LoginResponse),
        (status = 400, description = "Missing field"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(username = user.username.as_deref().unwrap_or_default())
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    let username = required(&user.username, "username")?;
    let password = required_secret(&user.password, "password")?;

    let auth_user = match authenticate(username, password, pool.get_ref()).await {
        Ok(u) => u,
        Err(e) => {
            warn!("Login failed: {}", e);
            return Err(e);
        }
    };

    let token = issue_session_token(&auth_user, &config.secret_key, config.session_ttl).map_err(|e| {
        error!(error = %e, "Failed to sign session token");
        AppError::Internal("session signing failed".to_string())
    })?;

    let cookie = Cookie::build(SESSION_COOKIE, token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(config.session_ttl as i64))
        .finish();

    info!(user_id = auth_user.user_id, role = %auth_user.role.name(), "Login successful");

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        message: "Login successful".to_string(),
        access_token: token,
        role: auth_user.role.name().to_string(),
        redirect: "/dashboard".to_string(),
    }))
}

/// End the session (idempotent)
#[utoipa::path(
    get,
    path = "/logout",
    responses((status = 200, description = "Session cookie cleared")),
    tag = "Auth"
)]
pub async fn logout() -> impl Responder {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(json!({
        "message": "Logged out successfully",
        "redirect": "/login"
    }))
}

/// Role-specific landing data
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard for the caller's role", body = Object),
        (status = 401, description = "Login required")
    ),
    security(("session" = [])),
    tag = "Auth"
)]
pub async fn dashboard(
    auth: AuthUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    let pool = pool.get_ref();

    let body = match auth.role {
        Role::Manager => json!({
            "role": auth.role.name(),
            "username": auth.username,
            "groups": list_groups(pool).await?,
        }),
        Role::GroupLeader { group_id } => json!({
            "role": auth.role.name(),
            "username": auth.username,
            "group": find_group(pool, group_id).await?,
            "sub_groups": sub_groups_of(pool, group_id).await?,
        }),
        Role::SubGroupLeader { sub_group_id } => json!({
            "role": auth.role.name(),
            "username": auth.username,
            "sub_group": find_sub_group(pool, sub_group_id).await?,
            "employees": employees_of(pool, sub_group_id).await?,
        }),
    };

    Ok(HttpResponse::Ok().json(body))
}
