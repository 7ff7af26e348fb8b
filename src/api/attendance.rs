use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::{
    api::{employee::employees_of, sub_group_leader::find_sub_group},
    auth::auth::AuthUser,
    config::{AccessScope, AttendancePolicy, Config},
    db::DbPool,
    error::{AppError, AuthError, ValidationError},
    model::{
        attendance::ABSENT,
        employee::Employee,
        group::SubGroup,
        role::{Role, RoleName},
    },
};

const ATTENDANCE_ROLES: &[RoleName] = &[
    RoleName::Manager,
    RoleName::GroupLeader,
    RoleName::SubGroupLeader,
];

#[derive(Deserialize, Serialize, ToSchema)]
pub struct RecordAttendance {
    #[schema(example = "2024-01-01", value_type = String)]
    pub date: Option<NaiveDate>,
    /// Status per employee id; employees left out are marked `Absent`.
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"1": "Present", "2": "Absent"}))]
    pub statuses: HashMap<i64, String>,
}

#[derive(Serialize, ToSchema)]
pub struct RosterResponse {
    pub sub_group: SubGroup,
    pub employees: Vec<Employee>,
}

/// Whether `role` may work with the roster of `sub_group` under `scope`.
pub fn may_access_sub_group(role: &Role, sub_group: &SubGroup, scope: AccessScope) -> bool {
    match (scope, role) {
        (AccessScope::Open, _) | (_, Role::Manager) => true,
        (AccessScope::Scoped, Role::GroupLeader { group_id }) => sub_group.group_id == *group_id,
        (AccessScope::Scoped, Role::SubGroupLeader { sub_group_id }) => sub_group.id == *sub_group_id,
    }
}

/// Employees of a sub-group the actor is allowed to mark attendance for.
pub async fn open_roster(
    actor: &AuthUser,
    sub_group_id: i64,
    scope: AccessScope,
    pool: &DbPool,
) -> Result<(SubGroup, Vec<Employee>), AppError> {
    actor.require_role(ATTENDANCE_ROLES)?;

    let sub_group = find_sub_group(pool, sub_group_id)
        .await?
        .ok_or(ValidationError::UnknownReference("sub_group"))?;

    if !may_access_sub_group(&actor.role, &sub_group, scope) {
        warn!(actor = actor.user_id, sub_group_id, "Roster access outside own unit");
        return Err(AuthError::Unauthorized.into());
    }

    let employees = employees_of(pool, sub_group_id).await?;
    Ok((sub_group, employees))
}

/// Writes one attendance row per roster employee for `date`, atomically.
/// Returns the number of rows written.
pub async fn record_attendance(
    actor: &AuthUser,
    sub_group_id: i64,
    date: NaiveDate,
    statuses: &HashMap<i64, String>,
    config: &Config,
    pool: &DbPool,
) -> Result<usize, AppError> {
    let (_, roster) = open_roster(actor, sub_group_id, config.access_scope, pool).await?;

    let mut tx = pool.begin().await?;

    for employee in &roster {
        let status = statuses
            .get(&employee.id)
            .map(String::as_str)
            .unwrap_or(ABSENT);

        if config.attendance_policy == AttendancePolicy::Upsert {
            sqlx::query("DELETE FROM attendance WHERE employee_id = ? AND date = ?")
                .bind(employee.id)
                .bind(date)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, status, marked_by)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(employee.id)
        .bind(date)
        .bind(status)
        .bind(actor.user_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(
        sub_group_id,
        %date,
        rows = roster.len(),
        marked_by = actor.user_id,
        policy = config.attendance_policy.as_ref(),
        "Attendance saved"
    );
    Ok(roster.len())
}

/// Roster of a sub-group
///
/// With the default `ACCESS_SCOPE=scoped` group leaders reach the sub-groups
/// of their own group and sub-group leaders only their own sub-group;
/// `ACCESS_SCOPE=open` lets all three roles reach any sub-group.
#[utoipa::path(
    get,
    path = "/attendance/{sub_group_id}",
    params(("sub_group_id", Path, description = "Sub-group ID")),
    responses(
        (status = 200, description = "Roster", body = RosterResponse),
        (status = 403, description = "Not allowed for this sub-group"),
        (status = 404, description = "Unknown sub-group")
    ),
    security(("session" = [])),
    tag = "Attendance"
)]
pub async fn roster(
    auth: AuthUser,
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let (sub_group, employees) =
        open_roster(&auth, path.into_inner(), config.access_scope, pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(RosterResponse { sub_group, employees }))
}

/// Record attendance for a sub-group
///
/// The default `ATTENDANCE_POLICY=upsert` replaces earlier rows of the same
/// employee and date; `ATTENDANCE_POLICY=append` keeps every submission.
#[utoipa::path(
    post,
    path = "/attendance/{sub_group_id}",
    params(("sub_group_id", Path, description = "Sub-group ID")),
    request_body = RecordAttendance,
    responses(
        (status = 200, description = "Attendance saved", body = Object, example = json!({
            "message": "Attendance saved", "rows": 3, "redirect": "/dashboard"
        })),
        (status = 400, description = "Missing date"),
        (status = 403, description = "Not allowed for this sub-group"),
        (status = 404, description = "Unknown sub-group")
    ),
    security(("session" = [])),
    tag = "Attendance"
)]
pub async fn save_attendance(
    auth: AuthUser,
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    payload: web::Json<RecordAttendance>,
) -> Result<HttpResponse, AppError> {
    let date = payload.date.ok_or(ValidationError::MissingField("date"))?;

    let rows = record_attendance(
        &auth,
        path.into_inner(),
        date,
        &payload.statuses,
        config.get_ref(),
        pool.get_ref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance saved",
        "rows": rows,
        "redirect": "/dashboard"
    })))
}
