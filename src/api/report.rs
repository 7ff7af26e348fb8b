use actix_web::{HttpResponse, http::header::ContentDisposition, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::auth::AuthUser,
    config::{AccessScope, Config},
    db::DbPool,
    error::{AppError, ValidationError},
    model::{
        attendance::PRESENT,
        employee::display_code,
        role::{Role, RoleName},
    },
    utils::spreadsheet::{XLSX_CONTENT_TYPE, report_csv, report_workbook},
};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportRow {
    pub employee_id: i64,
    #[schema(example = "Carol Smith")]
    pub employee: String,
    #[schema(example = "North-A-001")]
    pub code: String,
    #[schema(example = "North-A")]
    pub sub_group: String,
    #[schema(example = 20)]
    pub total_days: i64,
    #[schema(example = 18)]
    pub present_days: i64,
    #[schema(example = 90.0)]
    pub attendance_percent: f64,
}

#[derive(sqlx::FromRow)]
struct TallyRow {
    employee_id: i64,
    employee: String,
    seq: i64,
    sub_group: String,
    total_days: i64,
    present_days: i64,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// `xlsx` (default), `csv` or `json`
    pub format: Option<String>,
}

/// Percentage of present days, rounded to two decimals; 0 without any rows.
pub fn attendance_percent(present_days: i64, total_days: i64) -> f64 {
    if total_days <= 0 {
        return 0.0;
    }
    let pct = present_days as f64 / total_days as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// One row per employee visible to the actor, ordered by employee id.
pub async fn build_attendance_report(
    actor: &AuthUser,
    scope: AccessScope,
    pool: &DbPool,
) -> Result<Vec<ReportRow>, AppError> {
    actor.require_role(&[RoleName::Manager, RoleName::GroupLeader])?;

    let group_filter = match (scope, &actor.role) {
        (AccessScope::Scoped, Role::GroupLeader { group_id }) => Some(*group_id),
        _ => None,
    };

    let tallies = sqlx::query_as::<_, TallyRow>(
        r#"
        SELECT
            e.id AS employee_id,
            e.name AS employee,
            e.seq AS seq,
            s.name AS sub_group,
            COUNT(a.id) AS total_days,
            COALESCE(SUM(CASE WHEN a.status = ? THEN 1 ELSE 0 END), 0) AS present_days
        FROM employees e
        JOIN subgroups s ON s.id = e.sub_group_id
        LEFT JOIN attendance a ON a.employee_id = e.id
        WHERE (? IS NULL OR s.group_id = ?)
        GROUP BY e.id, e.name, e.seq, s.name
        ORDER BY e.id
        "#,
    )
    .bind(PRESENT)
    .bind(group_filter)
    .bind(group_filter)
    .fetch_all(pool)
    .await?;

    Ok(tallies
        .into_iter()
        .map(|t| ReportRow {
            employee_id: t.employee_id,
            code: display_code(&t.sub_group, t.seq),
            employee: t.employee,
            sub_group: t.sub_group,
            total_days: t.total_days,
            present_days: t.present_days,
            attendance_percent: attendance_percent(t.present_days, t.total_days),
        })
        .collect())
}

/// Attendance statistics export
///
/// With the default `ACCESS_SCOPE=scoped` a group leader only gets the
/// employees of their own group; `ACCESS_SCOPE=open` returns every employee.
/// Under the default `ATTENDANCE_POLICY=upsert`, Total Days counts each
/// recorded date once; `append` counts every submission.
#[utoipa::path(
    get,
    path = "/attendance_report",
    params(ReportQuery),
    responses(
        (status = 200, description = "attendance_report.xlsx (or .csv / JSON rows)", body = Vec<ReportRow>),
        (status = 400, description = "Unsupported format"),
        (status = 403, description = "Managers and group leaders only")
    ),
    security(("session" = [])),
    tag = "Report"
)]
pub async fn attendance_report(
    auth: AuthUser,
    query: web::Query<ReportQuery>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let format = query.format.as_deref().unwrap_or("xlsx");
    let rows = build_attendance_report(&auth, config.access_scope, pool.get_ref()).await?;
    info!(requested_by = auth.user_id, rows = rows.len(), format, "Attendance report built");

    match format {
        "json" => Ok(HttpResponse::Ok().json(rows)),
        "csv" => {
            let body = report_csv(&rows).map_err(|e| {
                error!(error = %e, "Failed to write csv report");
                AppError::Internal("csv export failed".to_string())
            })?;
            Ok(HttpResponse::Ok()
                .content_type("text/csv")
                .insert_header(ContentDisposition::attachment("attendance_report.csv"))
                .body(body))
        }
        "xlsx" => {
            let body = report_workbook(&rows).map_err(|e| {
                error!(error = %e, "Failed to write xlsx report");
                AppError::Internal("xlsx export failed".to_string())
            })?;
            Ok(HttpResponse::Ok()
                .content_type(XLSX_CONTENT_TYPE)
                .insert_header(ContentDisposition::attachment("attendance_report.xlsx"))
                .body(body))
        }
        other => Err(ValidationError::UnsupportedFormat(other.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::attendance_percent;

    #[test]
    fn percent_is_zero_without_rows() {
        assert_eq!(attendance_percent(0, 0), 0.0);
    }

    #[test]
    fn percent_rounds_to_two_decimals() {
        assert_eq!(attendance_percent(1, 1), 100.0);
        assert_eq!(attendance_percent(1, 3), 33.33);
        assert_eq!(attendance_percent(2, 3), 66.67);
        assert_eq!(attendance_percent(0, 4), 0.0);
        assert_eq!(attendance_percent(7, 8), 87.5);
    }
}
