use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Login request body. Fields take any JSON value at the parsing stage; a missing or non-string field is reported as a
/// failed login, not as a malformed request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub password: Option<Value>,
}

impl LoginRequest {
    /// The email and password, if both are present as strings.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let email = self.email.as_ref()?.as_str()?;
        let password = self.password.as_ref()?.as_str()?;
        Some((email.trim(), password))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonMessage {
    pub message: String,
}

impl JsonMessage {
    pub fn new<S: Display>(message: S) -> Self {
        Self { message: message.to_string() }
    }
}
