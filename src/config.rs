use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumString};

/// Who may open a roster or read the report beyond their own unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AccessScope {
    /// Leaders only reach their own group / sub-group; managers reach everything.
    Scoped,
    /// Any attendance role reaches any sub-group, report covers all employees.
    Open,
}

/// What happens when attendance for an (employee, date) is recorded twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AttendancePolicy {
    /// The latest submission replaces earlier rows for the same day.
    Upsert,
    /// Every submission is kept.
    Append,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub server_addr: String,
    pub session_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub access_scope: AccessScope,
    pub attendance_policy: AttendancePolicy,

    pub log_dir: String,

    /// Seeds a first manager account when none exists yet.
    pub bootstrap_manager: Option<(String, String)>,
}

fn var_or<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value: {raw:?}"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let bootstrap_manager = match (
            env::var("BOOTSTRAP_MANAGER_USERNAME"),
            env::var("BOOTSTRAP_MANAGER_PASSWORD"),
        ) {
            (Ok(u), Ok(p)) if !u.trim().is_empty() && !p.is_empty() => {
                Some((u.trim().to_string(), p))
            }
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            secret_key: env::var("SECRET_KEY").context("SECRET_KEY must be set")?,
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            session_ttl: var_or("SESSION_TTL", "28800")?, // default 8 hours

            rate_login_per_min: var_or("RATE_LOGIN_PER_MIN", "60")?,
            rate_protected_per_min: var_or("RATE_PROTECTED_PER_MIN", "1000")?,

            access_scope: var_or("ACCESS_SCOPE", "scoped")?,
            attendance_policy: var_or("ATTENDANCE_POLICY", "upsert")?,

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            bootstrap_manager,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_parse_from_snake_case() {
        assert_eq!(AccessScope::from_str("open").unwrap(), AccessScope::Open);
        assert_eq!(AccessScope::from_str("scoped").unwrap(), AccessScope::Scoped);
        assert_eq!(
            AttendancePolicy::from_str("append").unwrap(),
            AttendancePolicy::Append
        );
        assert!(AttendancePolicy::from_str("replace").is_err());
    }
}
