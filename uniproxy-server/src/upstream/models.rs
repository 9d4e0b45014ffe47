//! Request and response shapes of the university service, one per call site.

use crate::auth::StudentIdentity;
use crate::models::Roles;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Module identifier the university service expects on sign-in
pub const SIGN_IN_MODULE: &str = "ExamCell";

/// Fallback message when the service accepts a password change without saying anything
pub const PASSWORD_CHANGE_ACCEPTED: &str = "Password change request accepted";

/// Fallback message when the service declines a password change without a reason
pub const PASSWORD_CHANGE_FAILED: &str = "Failed to change password";

/// Sign-in request body
#[derive(Serialize, Clone, PartialEq)]
pub struct SignInPayload<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(rename = "ipAddress")]
    pub ip_address: &'a str,
    pub module: &'static str,
    pub domain: &'a str,
}

/// Change-password request body
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChangePasswordPayload<'a> {
    #[serde(rename = "emailId")]
    pub email_id: &'a str,
}

/// Interpretation of a successful sign-in response
#[derive(Debug, Clone, PartialEq)]
pub enum SignInReply {
    /// The service vouched for this student
    Identity(StudentIdentity),
    /// The body lacks the username or roles
    Unrecognized,
}

impl SignInReply {
    pub fn from_body(body: Value) -> Self {
        #[derive(Deserialize)]
        struct SignInBody {
            username: String,
            roles: Roles,
        }

        match serde_json::from_value::<SignInBody>(body) {
            Ok(body) if !body.username.trim().is_empty() => Self::Identity(StudentIdentity {
                roll_no: body.username,
                roles: body.roles,
            }),
            _ => Self::Unrecognized,
        }
    }
}

/// Interpretation of a successful change-password response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangePasswordReply {
    /// `status` is truthy, the message is relayed to the caller
    Accepted(String),
    /// `status` is falsy or absent, the message is relayed as the failure reason
    Declined(String),
}

impl ChangePasswordReply {
    pub fn from_body(body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        if body.get("status").is_some_and(is_truthy) {
            Self::Accepted(message.unwrap_or_else(|| PASSWORD_CHANGE_ACCEPTED.to_string()))
        } else {
            Self::Declined(message.unwrap_or_else(|| PASSWORD_CHANGE_FAILED.to_string()))
        }
    }
}

/// Loose truth value of a status flag: `false`, `null`, zero and empty values are false
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
