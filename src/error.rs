use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use tracing::error;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[display(fmt = "Invalid credentials")]
    InvalidCredentials,
    #[display(fmt = "Unauthorized")]
    Unauthorized,
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[display(fmt = "Username already exists")]
    DuplicateUsername,
    #[display(fmt = "Missing field: {}", _0)]
    MissingField(&'static str),
    #[display(fmt = "Unknown {}", _0)]
    UnknownReference(&'static str),
    #[display(fmt = "Unsupported format: {}", _0)]
    UnsupportedFormat(String),
}

/// Error type shared by every request handler.
#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "{}", _0)]
    Auth(AuthError),
    #[display(fmt = "{}", _0)]
    Validation(ValidationError),
    #[display(fmt = "Database error: {}", _0)]
    Database(sqlx::Error),
    #[display(fmt = "Internal error: {}", _0)]
    Internal(String),
}

impl AppError {
    /// Page the client should fall back to after the notice is shown.
    pub fn redirect(&self) -> &'static str {
        match self {
            AppError::Auth(AuthError::InvalidCredentials) => "/login",
            _ => "/dashboard",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            AppError::Auth(AuthError::Unauthorized) => StatusCode::FORBIDDEN,
            AppError::Validation(ValidationError::DuplicateUsername) => StatusCode::CONFLICT,
            AppError::Validation(
                ValidationError::MissingField(_) | ValidationError::UnsupportedFormat(_),
            ) => StatusCode::BAD_REQUEST,
            AppError::Validation(ValidationError::UnknownReference(_)) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(_) | AppError::Internal(_) => {
                error!(error = %self, "Request failed");
                "Something went wrong, Contact with system admin".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "error": message,
            "redirect": self.redirect(),
        }))
    }
}

/// Returns the trimmed value of a required text field.
pub fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Returns a required secret exactly as sent; only an empty value is refused.
pub fn required_secret<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_absent_and_blank_values() {
        assert_eq!(required(&Some(" bob ".into()), "username"), Ok("bob"));
        assert_eq!(
            required(&Some("   ".into()), "username"),
            Err(ValidationError::MissingField("username"))
        );
        assert_eq!(required(&None, "date"), Err(ValidationError::MissingField("date")));
    }

    #[test]
    fn required_secret_keeps_surrounding_whitespace() {
        assert_eq!(required_secret(&Some(" pad pass ".into()), "password"), Ok(" pad pass "));
        assert_eq!(required_secret(&Some("   ".into()), "password"), Ok("   "));
        assert_eq!(
            required_secret(&Some(String::new()), "password"),
            Err(ValidationError::MissingField("password"))
        );
    }

    #[test]
    fn errors_map_to_status_and_safe_page() {
        let invalid = AppError::from(AuthError::InvalidCredentials);
        assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.redirect(), "/login");

        let denied = AppError::from(AuthError::Unauthorized);
        assert_eq!(denied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(denied.redirect(), "/dashboard");

        let dup = AppError::from(ValidationError::DuplicateUsername);
        assert_eq!(dup.status_code(), StatusCode::CONFLICT);

        let format = AppError::from(ValidationError::UnsupportedFormat("pdf".into()));
        assert_eq!(format.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(format.to_string(), "Unsupported format: pdf");
    }
}
