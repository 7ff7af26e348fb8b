use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::{auth::auth::AuthUser, model::role::Role, models::Claims};

pub const SESSION_COOKIE: &str = "session";

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or(0)
}

/// Signs the session bundle of an authenticated user.
pub fn issue_session_token(user: &AuthUser, secret: &str, ttl: usize) -> Result<String, Error> {
    let claims = Claims {
        user_id: user.user_id,
        sub: user.username.clone(),
        role: user.role.name().to_string(),
        group_id: user.role.group_id(),
        sub_group_id: user.role.sub_group_id(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

/// Decodes a token back into the session bundle.
pub fn session_from_token(token: &str, secret: &str) -> Result<AuthUser, String> {
    let claims = verify_token(token, secret)?;
    let role = Role::from_parts(&claims.role, claims.group_id, claims.sub_group_id)
        .ok_or_else(|| "Invalid role".to_string())?;

    Ok(AuthUser {
        user_id: claims.user_id,
        username: claims.sub,
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_carries_role_and_scope() {
        let user = AuthUser {
            user_id: 7,
            username: "bob".into(),
            role: Role::SubGroupLeader { sub_group_id: 3 },
        };
        let token = issue_session_token(&user, "secret", 60).unwrap();
        let back = session_from_token(&token, "secret").unwrap();

        assert_eq!(back.user_id, 7);
        assert_eq!(back.username, "bob");
        assert_eq!(back.role, Role::SubGroupLeader { sub_group_id: 3 });
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let user = AuthUser {
            user_id: 1,
            username: "boss".into(),
            role: Role::Manager,
        };
        let token = issue_session_token(&user, "secret", 60).unwrap();
        assert!(session_from_token(&token, "other").is_err());
    }
}
