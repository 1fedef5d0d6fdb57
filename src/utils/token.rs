use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ErrorMessage, HttpError},
    models::usermodel::UserRole,
};

/// Claims carried by every session token. All fields are required; a token
/// missing any of them fails verification instead of being partially
/// trusted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenClaims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

impl TokenClaims {
    pub fn user_id(&self) -> Result<Uuid, HttpError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))
    }

    pub fn role(&self) -> Result<UserRole, HttpError> {
        UserRole::from_str(&self.role)
            .ok_or_else(|| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))
    }
}

pub fn create_token(
    user_id: &str,
    email: &str,
    role: UserRole,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if user_id.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_str().to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(expires_in_minutes)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<TokenClaims, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    );

    match decoded {
        Ok(token) => Ok(token.claims),
        Err(_) => Err(HttpError::unauthorized(
            ErrorMessage::InvalidToken.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-jwt-secret";

    fn user_id() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn token_round_trips_claims() {
        let id = user_id();
        let token =
            create_token(&id.to_string(), "ada@example.com", UserRole::Agent, SECRET, 60).unwrap();

        let claims = decode_token(token, SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role().unwrap(), UserRole::Agent);
    }

    #[test]
    fn expired_token_is_rejected() {
        let id = user_id();
        let token =
            create_token(&id.to_string(), "ada@example.com", UserRole::User, SECRET, -60).unwrap();

        assert!(decode_token(token, SECRET).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let id = user_id();
        let token =
            create_token(&id.to_string(), "ada@example.com", UserRole::User, SECRET, 60).unwrap();

        assert!(decode_token(token, b"some-other-secret").is_err());
    }

    #[test]
    fn token_with_unknown_role_claim_fails_role_resolution() {
        let claims = TokenClaims {
            sub: user_id().to_string(),
            email: "ada@example.com".to_string(),
            role: "owner".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(claims.role().is_err());
    }

    #[test]
    fn empty_user_id_is_rejected_at_signing() {
        assert!(create_token("", "ada@example.com", UserRole::User, SECRET, 60).is_err());
    }
}
