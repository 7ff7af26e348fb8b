use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::{
    api::users::insert_user,
    auth::auth::AuthUser,
    db::DbPool,
    error::{AppError, AuthError, ValidationError, required, required_secret},
    model::{
        group::SubGroup,
        role::{Role, RoleName},
    },
    utils::username_index::UsernameIndex,
};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateSubGroupLeader {
    #[schema(example = "bob")]
    pub username: Option<String>,
    #[schema(example = "correct horse battery staple")]
    pub password: Option<String>,
    #[schema(example = 3)]
    pub sub_group_id: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct SubGroupListResponse {
    pub sub_groups: Vec<SubGroup>,
}

pub async fn find_sub_group(pool: &DbPool, sub_group_id: i64) -> Result<Option<SubGroup>, sqlx::Error> {
    sqlx::query_as::<_, SubGroup>("SELECT id, name, group_id FROM subgroups WHERE id = ?")
        .bind(sub_group_id)
        .fetch_optional(pool)
        .await
}

pub async fn sub_groups_of(pool: &DbPool, group_id: i64) -> Result<Vec<SubGroup>, sqlx::Error> {
    sqlx::query_as::<_, SubGroup>(
        "SELECT id, name, group_id FROM subgroups WHERE group_id = ? ORDER BY name",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await
}

/// Group leader creates a sub-group leader for one of the sub-groups of
/// their own group. Sub-groups elsewhere (or nonexistent) are refused.
pub async fn create_sub_group_leader(
    actor: &AuthUser,
    payload: &CreateSubGroupLeader,
    pool: &DbPool,
    index: &UsernameIndex,
) -> Result<i64, AppError> {
    actor.require_role(&[RoleName::GroupLeader])?;
    let own_group = actor.role.group_id().ok_or(AuthError::Unauthorized)?;

    let username = required(&payload.username, "username")?;
    let password = required_secret(&payload.password, "password")?;
    let sub_group_id = payload
        .sub_group_id
        .ok_or(ValidationError::MissingField("sub_group_id"))?;

    match find_sub_group(pool, sub_group_id).await? {
        Some(sg) if sg.group_id == own_group => {}
        _ => {
            warn!(
                actor = actor.user_id,
                sub_group_id, own_group, "Refused sub-group outside own group"
            );
            return Err(AuthError::Unauthorized.into());
        }
    }

    insert_user(username, password, Role::SubGroupLeader { sub_group_id }, pool, index).await
}

/// Sub-groups of the caller's own group
#[utoipa::path(
    get,
    path = "/add_sub_group_leader",
    responses(
        (status = 200, description = "Own sub-groups", body = SubGroupListResponse),
        (status = 401, description = "Login required"),
        (status = 403, description = "Group leaders only")
    ),
    security(("session" = [])),
    tag = "Hierarchy"
)]
pub async fn sub_group_leader_form(
    auth: AuthUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    auth.require_role(&[RoleName::GroupLeader])?;
    let group_id = auth.role.group_id().ok_or(AuthError::Unauthorized)?;

    let sub_groups = sub_groups_of(pool.get_ref(), group_id).await?;
    Ok(HttpResponse::Ok().json(SubGroupListResponse { sub_groups }))
}

/// Create a sub-group leader
#[utoipa::path(
    post,
    path = "/add_sub_group_leader",
    request_body = CreateSubGroupLeader,
    responses(
        (status = 201, description = "Sub-group leader created", body = Object, example = json!({
            "message": "Sub-Group Leader added", "user_id": 3, "redirect": "/dashboard"
        })),
        (status = 400, description = "Missing field"),
        (status = 403, description = "Not a group leader, or sub-group outside own group"),
        (status = 409, description = "Username already exists")
    ),
    security(("session" = [])),
    tag = "Hierarchy"
)]
pub async fn add_sub_group_leader(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    index: web::Data<UsernameIndex>,
    payload: web::Json<CreateSubGroupLeader>,
) -> Result<HttpResponse, AppError> {
    let user_id = create_sub_group_leader(&auth, &payload, pool.get_ref(), index.get_ref()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Sub-Group Leader added",
        "user_id": user_id,
        "redirect": "/dashboard"
    })))
}
