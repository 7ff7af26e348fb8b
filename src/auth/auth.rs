use crate::auth::session::{SESSION_COOKIE, session_from_token};
use crate::config::Config;
use crate::error::AuthError;
use crate::model::role::{Role, RoleName};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};

/// Session bundle of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

/// Session token from `Authorization: Bearer ...`, else from the session cookie.
pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // already resolved by auth_middleware
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let token = match token_from_request(req) {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing session"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(
                    actix_web::error::ErrorInternalServerError("Config missing"),
                ))
            }
        };

        ready(session_from_token(&token, &config.secret_key).map_err(ErrorUnauthorized))
    }
}

impl AuthUser {
    /// Passes only when the session's role is one of `allowed`.
    pub fn require_role(&self, allowed: &[RoleName]) -> Result<(), AuthError> {
        if allowed.contains(&self.role.name()) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: 1,
            username: "u".into(),
            role,
        }
    }

    #[test]
    fn require_role_checks_membership_only() {
        let gl = user(Role::GroupLeader { group_id: 1 });
        assert!(gl.require_role(&[RoleName::Manager, RoleName::GroupLeader]).is_ok());
        assert_eq!(gl.require_role(&[RoleName::Manager]), Err(AuthError::Unauthorized));
        assert_eq!(gl.require_role(&[]), Err(AuthError::Unauthorized));
    }
}
