//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Passwords stay out of logs.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn login_request_round_trips() -> Result<()> {
        let decoded: LoginRequest =
            serde_json::from_value(serde_json::json!({"email": "a@x.com", "password": "pw"}))?;
        assert_eq!(decoded.email, "a@x.com");
        assert_eq!(decoded.password, "pw");
        Ok(())
    }

    #[test]
    fn login_request_debug_redacts_password() {
        let request = LoginRequest {
            email: "a@x.com".to_string(),
            password: "hunter2".to_string(),
        };
        let printed = format!("{request:?}");
        assert!(printed.contains("a@x.com"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn login_response_uses_camel_case() -> Result<()> {
        let response = LoginResponse {
            message: "Logged in successfully.".to_string(),
            user_id: "42".to_string(),
        };
        let value = serde_json::to_value(&response)?;
        let user_id = value
            .get("userId")
            .and_then(serde_json::Value::as_str)
            .context("missing userId")?;
        assert_eq!(user_id, "42");
        Ok(())
    }

    #[test]
    fn session_response_uses_camel_case() -> Result<()> {
        let response = SessionResponse {
            user_id: "42".to_string(),
        };
        let value = serde_json::to_value(&response)?;
        assert!(value.get("userId").is_some());
        Ok(())
    }
}
