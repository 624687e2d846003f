//! Authentication request and response payloads.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// User password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username (unique).
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    /// User email (unique).
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// User email.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
}

/// Session status response for `GET /auth/status`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthStatus {
    /// Whether the request carries a valid session.
    pub authenticated: bool,
    /// The authenticated user, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

/// Profile update request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_serializes_expected_fields() {
        let info = UserInfo {
            id: 7,
            username: "mehmet".to_string(),
            email: "mehmet@example.com".to_string(),
            name: Some("Mehmet Usta".to_string()),
        };

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["username"], "mehmet");
        assert_eq!(value["email"], "mehmet@example.com");
        assert_eq!(value["name"], "Mehmet Usta");
    }

    #[test]
    fn test_auth_status_omits_missing_user() {
        let status = AuthStatus {
            authenticated: false,
            user: None,
        };

        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["authenticated"], false);
        assert!(value.get("user").is_none());
    }

    #[test]
    fn test_register_request_name_defaults_to_none() {
        let payload: RegisterRequest = serde_json::from_str(
            r#"{"username": "ali", "email": "ali@example.com", "password": "secret1"}"#,
        )
        .unwrap();

        assert_eq!(payload.username, "ali");
        assert!(payload.name.is_none());
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            username: "ali".to_string(),
            email: "ali@example.com".to_string(),
            password: "secret1".to_string(),
            name: None,
        };
        assert!(valid.validate().is_ok());

        let short_username = RegisterRequest {
            username: "al".to_string(),
            ..valid.clone()
        };
        assert!(short_username.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "12345".to_string(),
            ..valid
        };
        assert!(short_password.validate().is_err());
    }
}
