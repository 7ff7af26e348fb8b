use crate::api::attendance::{RecordAttendance, RosterResponse};
use crate::api::employee::{EmployeeFormResponse, RegisterEmployee};
use crate::api::group_leader::{CreateGroupLeader, GroupListResponse};
use crate::api::report::{ReportQuery, ReportRow};
use crate::api::sub_group_leader::{CreateSubGroupLeader, SubGroupListResponse};
use crate::auth::handlers::LoginResponse;
use crate::model::employee::Employee;
use crate::model::group::{Group, SubGroup};
use crate::models::LoginReqDto;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Tracker API",
        version = "0.1.0",
        description = r#"
## Attendance tracking

Managers create group leaders, group leaders create sub-group leaders for their
own sub-groups, sub-group leaders register employees and mark daily attendance.
Managers and group leaders export attendance statistics.

### Session
`POST /login` sets a `session` cookie and also returns the token, which may be
sent as `Authorization: Bearer <token>` instead.

### Errors
Failures return `{"error": "...", "redirect": "/login" | "/dashboard"}`.
"#,
    ),
    paths(
        crate::auth::handlers::login_form,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::dashboard,

        crate::api::group_leader::group_leader_form,
        crate::api::group_leader::add_group_leader,

        crate::api::sub_group_leader::sub_group_leader_form,
        crate::api::sub_group_leader::add_sub_group_leader,

        crate::api::employee::employee_form,
        crate::api::employee::add_employee,

        crate::api::attendance::roster,
        crate::api::attendance::save_attendance,

        crate::api::report::attendance_report
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            Group,
            SubGroup,
            GroupListResponse,
            SubGroupListResponse,
            CreateGroupLeader,
            CreateSubGroupLeader,
            RegisterEmployee,
            EmployeeFormResponse,
            Employee,
            RecordAttendance,
            RosterResponse,
            ReportRow,
            ReportQuery
        )
    ),
    modifiers(&SessionSecurity),
    tags(
        (name = "Auth", description = "Login, logout and dashboard"),
        (name = "Hierarchy", description = "Group and sub-group leader management"),
        (name = "Employee", description = "Employee registration"),
        (name = "Attendance", description = "Daily attendance recording"),
        (name = "Report", description = "Attendance statistics export"),
    )
)]
pub struct ApiDoc;

struct SessionSecurity;

impl Modify for SessionSecurity {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
        );
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
