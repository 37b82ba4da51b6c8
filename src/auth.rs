//! Password hashing and bearer tokens.

use crate::config::AuthSettings;
use crate::error::AppError;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a token was issued to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Seller,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Seller => "seller",
            Role::Admin => "admin",
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Seller or admin id.
    pub sub: i64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing and verification keys plus token lifetime.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenKeys {
    pub fn new(settings: &AuthSettings) -> Self {
        let secret = settings.jwt_secret.as_bytes();
        TokenKeys {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs: settings.token_ttl.as_secs(),
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn issue(&self, sub: i64, role: Role) -> Result<String, AppError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub,
            role,
            iat,
            exp: iat + self.ttl_secs as i64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token encoding failed: {}", e)))
    }

    /// Verify signature and expiry. Any failure is a 401.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                AppError::Unauthorized("Invalid or expired token".into())
            })
    }
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys").field("ttl_secs", &self.ttl_secs).finish()
    }
}

/// Argon2id hash in PHC string form.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(hash: &str, password: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("stored password hash is invalid: {}", e)))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!("password verification failed: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn keys(ttl: u64) -> TokenKeys {
        TokenKeys::new(&AuthSettings {
            jwt_secret: "a-test-secret-that-is-long-enough-0001".into(),
            token_ttl: Duration::from_secs(ttl),
        })
    }

    #[test]
    fn token_round_trip_keeps_role() {
        let k = keys(3600);
        let token = k.issue(42, Role::Seller).unwrap();
        let claims = k.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Seller);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn foreign_signature_rejected() {
        let token = keys(3600).issue(1, Role::Admin).unwrap();
        let other = TokenKeys::new(&AuthSettings {
            jwt_secret: "another-secret-that-is-long-enough-0002".into(),
            token_ttl: Duration::from_secs(3600),
        });
        assert!(matches!(other.verify(&token), Err(AppError::Unauthorized(_))));
        assert!(matches!(other.verify("not.a.token"), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("Rahasia#123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "Rahasia#123").unwrap());
        assert!(!verify_password(&hash, "rahasia#123").unwrap());
        assert!(verify_password("plain", "x").is_err());
    }
}
