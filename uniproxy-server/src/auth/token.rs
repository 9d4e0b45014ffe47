//! Stateless bearer tokens: HS256 signed JWTs carrying the student's roll
//! number, roles and an expiry.

use crate::auth::AuthError;
use crate::models::Roles;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Lifetime of every issued token
pub const TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Errors that can occur while issuing a token
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("System time error: {0}")]
    Clock(#[from] std::time::SystemTimeError),
    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Identity asserted by the university service, the only input of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentIdentity {
    pub roll_no: String,
    pub roles: Roles,
}

/// Claims carried by a token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Student roll number
    #[serde(rename = "sub", default)]
    pub roll_no: String,
    /// Roles reported by the university service at sign-in
    #[serde(rename = "role", default)]
    pub roles: Roles,
    /// Issued at, seconds since the epoch
    pub iat: u64,
    /// Expires at, seconds since the epoch
    pub exp: u64,
}

impl Claims {
    pub fn identity(&self) -> StudentIdentity {
        StudentIdentity {
            roll_no: self.roll_no.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Issues and verifies tokens with the process-wide signing secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a codec with the default token lifetime
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, TOKEN_TTL)
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    #[allow(dead_code)]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a new token for the given identity, valid for the codec's TTL
    pub fn issue(&self, identity: &StudentIdentity) -> Result<String, TokenError> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        self.issue_at(identity, now)
    }

    /// Sign a token as if it had been issued at `issued_at` (seconds since the epoch)
    pub(crate) fn issue_at(
        &self,
        identity: &StudentIdentity,
        issued_at: u64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            roll_no: identity.roll_no.clone(),
            roles: identity.roles.clone(),
            iat: issued_at,
            exp: issued_at + self.ttl.as_secs(),
        };
        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)?;
        debug!(
            "Issued token for '{}', expires at {}",
            claims.roll_no, claims.exp
        );
        Ok(token)
    }

    /// Verify signature, algorithm and expiry of a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                AuthError::InvalidOrExpired
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test_jwt_secret";

    fn identity() -> StudentIdentity {
        StudentIdentity {
            roll_no: "21CS001".to_string(),
            roles: Roles::from_iter(["student"]),
        }
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.issue(&identity()).unwrap();
        assert!(!token.is_empty());

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.identity(), identity());
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL.as_secs());
    }

    #[test]
    fn test_round_trip_with_multiple_roles() {
        let codec = TokenCodec::new(SECRET);
        let identity = StudentIdentity {
            roll_no: "21CS002".to_string(),
            roles: Roles::from_iter(["student", "class-rep"]),
        };
        let token = codec.issue(&identity).unwrap();
        assert_eq!(codec.verify(&token).unwrap().identity(), identity);
    }

    #[test]
    fn test_default_ttl_is_thirty_minutes() {
        assert_eq!(TokenCodec::new(SECRET).ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new(SECRET);
        let issued_at = now() - TOKEN_TTL.as_secs() - 60;
        let token = codec.issue_at(&identity(), issued_at).unwrap();

        assert!(matches!(
            codec.verify(&token),
            Err(AuthError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let issuer = TokenCodec::new("another_secret");
        let verifier = TokenCodec::new(SECRET);
        let token = issuer.issue(&identity()).unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_foreign_payload_signed_with_other_secret_rejected() {
        let verifier = TokenCodec::new(SECRET);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({"anything": true, "exp": now() + 600}),
            &EncodingKey::from_secret(b"another_secret"),
        )
        .unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let verifier = TokenCodec::new(SECRET);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &json!({"sub": "21CS001", "role": ["student"], "iat": now(), "exp": now() + 600}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_missing_expiry_rejected() {
        let verifier = TokenCodec::new(SECRET);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({"sub": "21CS001", "role": ["student"]}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.issue(&identity()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = encode(
            &Header::new(Algorithm::HS256),
            &json!({"sub": "21CS999", "role": ["admin"], "iat": now(), "exp": now() + 600}),
            &EncodingKey::from_secret(b"forger"),
        )
        .unwrap();
        let forged_parts: Vec<&str> = forged_payload.split('.').collect();
        parts[1] = forged_parts[1];

        assert!(matches!(
            codec.verify(&parts.join(".")),
            Err(AuthError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let codec = TokenCodec::new(SECRET);
        for token in ["", "not-a-token", "a.b.c"] {
            assert!(matches!(
                codec.verify(token),
                Err(AuthError::InvalidOrExpired)
            ));
        }
    }

    #[test]
    fn test_token_without_subject_decodes_with_empty_roll_no() {
        let codec = TokenCodec::new(SECRET);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({"role": "student", "iat": now(), "exp": now() + 600}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let claims = codec.verify(&token).unwrap();
        assert!(claims.roll_no.is_empty());
        assert!(claims.roles.contains("student"));
    }
}
