use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use utoipa::ToSchema;

/// Token type returned with every access token
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// Student credentials, forwarded once to the university service and dropped
#[derive(Serialize, Deserialize, ToSchema, Clone)]
pub struct LoginRequest {
    /// University account username (roll number)
    pub username: String,
    /// University account password
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Issued bearer token
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct TokenResponse {
    /// Signed access token
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
        }
    }
}

/// Password reset request
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ChangePasswordRequest {
    /// Mail address registered with the university account
    pub mail: String,
}

/// Message relayed from the university service
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ErrorResponse {
    /// Human readable error message
    pub detail: String,
}

/// Canonical set of roles held by a student.
///
/// The university service reports roles either as a single string or as a
/// list of strings; both shapes deserialize into this set. It always
/// serializes as a sorted list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roles(BTreeSet<String>);

impl Roles {
    #[allow(dead_code)]
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Roles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(Into::into)
                .map(|role: String| role.trim().to_string())
                .filter(|role| !role.is_empty())
                .collect(),
        )
    }
}

impl Serialize for Roles {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for Roles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawRoles {
            One(String),
            Many(Vec<String>),
        }

        Ok(match RawRoles::deserialize(deserializer)? {
            RawRoles::One(role) => Roles::from_iter([role]),
            RawRoles::Many(roles) => Roles::from_iter(roles),
        })
    }
}
