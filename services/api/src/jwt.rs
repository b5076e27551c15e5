//! JWT service for session token issuance and validation
//!
//! Tokens are signed with HS256 using the configured shared secret and carry
//! exactly the subject id and role of the user they were issued for.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::user::{Role, User};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token expiration time in seconds
    pub token_expiry: u64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User role
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Identity attached to a request after token verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject_id: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            subject_id: user.id.clone(),
            role: user.role,
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Issue a signed token for a principal
    pub fn issue(&self, principal: &Principal) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: principal.subject_id.clone(),
            role: principal.role,
            iat: now,
            exp: now + self.config.token_expiry,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the principal it was issued for
    pub fn verify(&self, token: &str) -> Result<Principal> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(Principal {
            subject_id: token_data.claims.sub,
            role: token_data.claims.role,
        })
    }
}

#[cfg(test)]
pub(crate) fn test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "test-secret-key".to_string(),
        token_expiry: 3600,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist() -> Principal {
        Principal {
            subject_id: "u1".to_string(),
            role: Role::Artist,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let service = test_service();

        let token = service.issue(&artist()).unwrap();
        let principal = service.verify(&token).unwrap();

        assert_eq!(principal, artist());
        assert!(!principal.is_admin());
    }

    #[test]
    fn test_admin_role_survives_round_trip() {
        let service = test_service();
        let admin = Principal {
            subject_id: "a1".to_string(),
            role: Role::Admin,
        };

        let principal = service.verify(&service.issue(&admin).unwrap()).unwrap();

        assert!(principal.is_admin());
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let other = JwtService::new(JwtConfig {
            secret: "wrong-key".to_string(),
            token_expiry: 3600,
        });

        let token = other.issue(&artist()).unwrap();

        assert!(test_service().verify(&token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let service = test_service();
        let claims = Claims {
            sub: "u1".to_string(),
            role: Role::Artist,
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(test_service().verify("not.a.token").is_err());
    }
}
