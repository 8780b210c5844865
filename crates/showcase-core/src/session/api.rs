//! Authentication endpoints of the remote service.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login payload.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration payload.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// Successful login answer.
///
/// `token` is optional on the wire; a response without one is not a login.
#[derive(Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    /// Time to live of the token, in seconds
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("expires_in", &self.expires_in)
            .field("user_id", &self.user_id)
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// An abstract client for the user endpoints.
///
/// Implementations translate transport failures and non-success statuses
/// into [`ShowcaseError::Http`](crate::error::ShowcaseError::Http) so the
/// session logic can tell 401 apart from other failures.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Registers a new account. Does not authenticate the caller.
    async fn signup(&self, request: &SignupRequest) -> Result<()>;

    /// Exchanges credentials for a token.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_from_wire() {
        let json = r#"{"token":"abc","expiresIn":3600,"userId":"u1","isAdmin":true}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.token.as_deref(), Some("abc"));
        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.user_id.as_deref(), Some("u1"));
        assert!(response.is_admin);
    }

    #[test]
    fn test_signup_request_wire_names() {
        let request = SignupRequest {
            email: "a@haw-hamburg.de".into(),
            password: "Secret123".into(),
            is_admin: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["isAdmin"], false);
        assert_eq!(value["email"], "a@haw-hamburg.de");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("a@haw-hamburg.de", "Secret123");
        assert!(!format!("{creds:?}").contains("Secret123"));
    }
}
