//! services/api/src/web/token.rs
//!
//! Issuing and verifying the HS256 bearer tokens handed out at login.

use booking_core::domain::User;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::ApiError;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_token(config: &Config, user: &User) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(config.jwt_expires_in_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
}

/// Checks signature and expiry. The role claim is informational only; the
/// auth middleware re-reads the role from the store.
pub fn verify_token(config: &Config, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_core::domain::Role;
    use tracing::Level;

    fn config(secret: &str) -> Config {
        Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            database_url: String::new(),
            database_max_connections: 1,
            log_level: Level::INFO,
            jwt_secret: secret.to_string(),
            jwt_expires_in_hours: 1,
            allowed_origins: Vec::new(),
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "pat@example.com".to_string(),
            name: "Pat".to_string(),
            role: Role::Patient,
            is_active: true,
            phone: None,
            address_line1: None,
            address_line2: None,
            gender: None,
            date_of_birth: None,
            image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_carries_identity_and_role() {
        let cfg = config("secret");
        let user = user();
        let claims = verify_token(&cfg, &issue_token(&cfg, &user).unwrap()).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, "PATIENT");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(&config("one"), &user()).unwrap();
        assert!(matches!(
            verify_token(&config("two"), &token),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let cfg = Config {
            jwt_expires_in_hours: -2,
            ..config("secret")
        };
        let token = issue_token(&cfg, &user()).unwrap();
        assert!(verify_token(&cfg, &token).is_err());
    }
}
