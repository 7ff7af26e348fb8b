use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Human readable employee identifier, e.g. `North-A-007`.
pub fn display_code(sub_group_name: &str, seq: i64) -> String {
    format!("{}-{:03}", sub_group_name, seq)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: i64,
    pub sub_group_id: i64,
    pub sub_group_name: String,
    pub seq: i64,
    pub name: String,
    pub father_name: String,
    pub sex: String,
    pub religion: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "code": "North-A-001",
        "sub_group_id": 3,
        "sub_group": "North-A",
        "name": "Carol Smith",
        "father_name": "David Smith",
        "sex": "F",
        "religion": "None",
        "department": "Assembly",
        "created_at": "2024-01-01T08:00:00Z"
    })
)]
pub struct Employee {
    pub id: i64,
    pub code: String,
    pub sub_group_id: i64,
    pub sub_group: String,
    pub name: String,
    pub father_name: String,
    pub sex: String,
    pub religion: String,
    pub department: String,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: row.id,
            code: display_code(&row.sub_group_name, row.seq),
            sub_group_id: row.sub_group_id,
            sub_group: row.sub_group_name,
            name: row.name,
            father_name: row.father_name,
            sex: row.sex,
            religion: row.religion,
            department: row.department,
            created_at: row.created_at,
        }
    }
}

/// Shared projection for queries returning `EmployeeRow`.
pub const EMPLOYEE_COLUMNS: &str = r#"
    e.id, e.sub_group_id, s.name AS sub_group_name, e.seq,
    e.name, e.father_name, e.sex, e.religion, e.department, e.created_at
"#;
