use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    api::users::insert_user,
    auth::auth::AuthUser,
    db::DbPool,
    error::{AppError, ValidationError, required, required_secret},
    model::{
        group::Group,
        role::{Role, RoleName},
    },
    utils::username_index::UsernameIndex,
};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateGroupLeader {
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[schema(example = "correct horse battery staple")]
    pub password: Option<String>,
    #[schema(example = 1)]
    pub group_id: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct GroupListResponse {
    pub groups: Vec<Group>,
}

pub async fn list_groups(pool: &DbPool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, name FROM groups ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn find_group(pool: &DbPool, group_id: i64) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, name FROM groups WHERE id = ?")
        .bind(group_id)
        .fetch_optional(pool)
        .await
}

/// Manager creates a group leader bound to `group_id`.
pub async fn create_group_leader(
    actor: &AuthUser,
    payload: &CreateGroupLeader,
    pool: &DbPool,
    index: &UsernameIndex,
) -> Result<i64, AppError> {
    actor.require_role(&[RoleName::Manager])?;

    let username = required(&payload.username, "username")?;
    let password = required_secret(&payload.password, "password")?;
    let group_id = payload
        .group_id
        .ok_or(ValidationError::MissingField("group_id"))?;

    if find_group(pool, group_id).await?.is_none() {
        return Err(ValidationError::UnknownReference("group").into());
    }

    insert_user(username, password, Role::GroupLeader { group_id }, pool, index).await
}

/// Groups a new group leader can be assigned to
#[utoipa::path(
    get,
    path = "/add_group_leader",
    responses(
        (status = 200, description = "All groups", body = GroupListResponse),
        (status = 401, description = "Login required"),
        (status = 403, description = "Managers only")
    ),
    security(("session" = [])),
    tag = "Hierarchy"
)]
pub async fn group_leader_form(
    auth: AuthUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    auth.require_role(&[RoleName::Manager])?;

    let groups = list_groups(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(GroupListResponse { groups }))
}

/// Create a group leader
#[utoipa::path(
    post,
    path = "/add_group_leader",
    request_body = CreateGroupLeader,
    responses(
        (status = 201, description = "Group leader created", body = Object, example = json!({
            "message": "Group Leader added", "user_id": 2, "redirect": "/dashboard"
        })),
        (status = 400, description = "Missing field"),
        (status = 403, description = "Managers only"),
        (status = 404, description = "Unknown group"),
        (status = 409, description = "Username already exists")
    ),
    security(("session" = [])),
    tag = "Hierarchy"
)]
pub async fn add_group_leader(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    index: web::Data<UsernameIndex>,
    payload: web::Json<CreateGroupLeader>,
) -> Result<HttpResponse, AppError> {
    let user_id = create_group_leader(&auth, &payload, pool.get_ref(), index.get_ref()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Group Leader added",
        "user_id": user_id,
        "redirect": "/dashboard"
    })))
}
