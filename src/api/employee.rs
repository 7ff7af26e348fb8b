use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    api::sub_group_leader::find_sub_group,
    auth::auth::AuthUser,
    db::DbPool,
    error::{AppError, AuthError, ValidationError, required},
    model::{
        employee::{EMPLOYEE_COLUMNS, Employee, EmployeeRow, display_code},
        group::SubGroup,
        role::RoleName,
    },
};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct RegisterEmployee {
    #[schema(example = "Carol Smith")]
    pub name: Option<String>,
    #[schema(example = "David Smith")]
    pub father_name: Option<String>,
    #[schema(example = "F")]
    pub sex: Option<String>,
    #[schema(example = "None")]
    pub religion: Option<String>,
    #[schema(example = "Assembly")]
    pub department: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeFormResponse {
    pub sub_group: SubGroup,
    /// Code the next registered employee will receive.
    #[schema(example = "North-A-004")]
    pub next_code: String,
}

pub async fn employees_of(pool: &DbPool, sub_group_id: i64) -> Result<Vec<Employee>, sqlx::Error> {
    let sql = format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees e JOIN subgroups s ON s.id = e.sub_group_id \
         WHERE e.sub_group_id = ? ORDER BY e.id"
    );

    let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
        .bind(sub_group_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(Employee::from).collect())
}

/// Sub-group leader registers an employee into their own sub-group.
///
/// The per-sub-group sequence is bumped and the employee inserted in one
/// transaction, so concurrent registrations never share a code.
pub async fn register_employee(
    actor: &AuthUser,
    payload: &RegisterEmployee,
    pool: &DbPool,
) -> Result<Employee, AppError> {
    actor.require_role(&[RoleName::SubGroupLeader])?;
    let sub_group_id = actor.role.sub_group_id().ok_or(AuthError::Unauthorized)?;

    let name = required(&payload.name, "name")?;
    let father_name = required(&payload.father_name, "father_name")?;
    let sex = required(&payload.sex, "sex")?;
    let religion = required(&payload.religion, "religion")?;
    let department = required(&payload.department, "department")?;

    let mut tx = pool.begin().await?;

    let (seq, sub_group_name) = sqlx::query_as::<_, (i64, String)>(
        r#"
        UPDATE subgroups
        SET employee_seq = employee_seq + 1
        WHERE id = ?
        RETURNING employee_seq, name
        "#,
    )
    .bind(sub_group_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ValidationError::UnknownReference("sub_group"))?;

    let created_at = Utc::now();
    let id = sqlx::query(
        r#"
        INSERT INTO employees
        (sub_group_id, seq, name, father_name, sex, religion, department, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(sub_group_id)
    .bind(seq)
    .bind(name)
    .bind(father_name)
    .bind(sex)
    .bind(religion)
    .bind(department)
    .bind(created_at)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    tx.commit().await?;

    let employee = Employee::from(EmployeeRow {
        id,
        sub_group_id,
        sub_group_name,
        seq,
        name: name.to_string(),
        father_name: father_name.to_string(),
        sex: sex.to_string(),
        religion: religion.to_string(),
        department: department.to_string(),
        created_at,
    });

    info!(employee_id = id, code = %employee.code, registered_by = actor.user_id, "Employee registered");
    Ok(employee)
}

/// Sub-group the caller registers employees into
#[utoipa::path(
    get,
    path = "/add_employee",
    responses(
        (status = 200, description = "Own sub-group", body = EmployeeFormResponse),
        (status = 403, description = "Sub-group leaders only")
    ),
    security(("session" = [])),
    tag = "Employee"
)]
pub async fn employee_form(
    auth: AuthUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, AppError> {
    auth.require_role(&[RoleName::SubGroupLeader])?;
    let sub_group_id = auth.role.sub_group_id().ok_or(AuthError::Unauthorized)?;

    let sub_group = find_sub_group(pool.get_ref(), sub_group_id)
        .await?
        .ok_or(ValidationError::UnknownReference("sub_group"))?;

    let last_seq = sqlx::query_scalar::<_, i64>("SELECT employee_seq FROM subgroups WHERE id = ?")
        .bind(sub_group_id)
        .fetch_one(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(EmployeeFormResponse {
        next_code: display_code(&sub_group.name, last_seq + 1),
        sub_group,
    }))
}

/// Register an employee
#[utoipa::path(
    post,
    path = "/add_employee",
    request_body = RegisterEmployee,
    responses(
        (status = 201, description = "Employee registered", body = Object, example = json!({
            "message": "Employee North-A-001 added successfully",
            "employee": {"id": 1, "code": "North-A-001"},
            "redirect": "/dashboard"
        })),
        (status = 400, description = "Missing field"),
        (status = 403, description = "Sub-group leaders only")
    ),
    security(("session" = [])),
    tag = "Employee"
)]
pub async fn add_employee(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    payload: web::Json<RegisterEmployee>,
) -> Result<HttpResponse, AppError> {
    let employee = register_employee(&auth, &payload, pool.get_ref()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": format!("Employee {} added successfully", employee.code),
        "employee": employee,
        "redirect": "/dashboard"
    })))
}
