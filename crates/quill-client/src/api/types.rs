// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request and response payloads.

use serde::{Deserialize, Serialize};

use crate::auth::{Role, UserInfo};
use crate::error::ClientResult;
use crate::validation::{validate_email, validate_password, validate_username};

// =============================================================================
// Requests
// =============================================================================

/// `POST /public/login` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

impl LoginRequest {
    /// Creates a login request.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Checks the fields before sending.
    pub fn validate(&self) -> ClientResult<()> {
        validate_username(&self.username)?;
        validate_password(&self.password)
    }
}

/// `POST /public/register` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl RegisterRequest {
    /// Creates a registration request.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks the fields before sending.
    pub fn validate(&self) -> ClientResult<()> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

/// `POST /auth/forgot-password` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Account email.
    pub email: String,
}

// =============================================================================
// Responses
// =============================================================================

/// `data` of a successful login.
///
/// The backend either nests the profile under `user` or returns its fields
/// next to the token; both shapes are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    /// Credential, when delivered in the body.
    #[serde(default, alias = "access_token", skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Nested profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,

    /// Profile fields at the top level.
    #[serde(flatten)]
    pub profile: UserInfo,
}

impl LoginData {
    /// Returns the signed-in user's profile.
    pub fn into_user(self) -> UserInfo {
        self.user.unwrap_or(self.profile)
    }
}

/// `data` of `GET /user/getRole`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleData {
    /// Role of the current user.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Body of `POST /auth/refresh`.
///
/// The new credential may sit at the top level or inside `data`, under
/// either `token` or `access_token`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshResponse {
    /// Envelope code.
    #[serde(default)]
    pub code: i64,
    /// Envelope message.
    #[serde(default)]
    pub message: Option<String>,
    /// Top-level credential.
    #[serde(default)]
    pub token: Option<String>,
    /// Top-level credential, alternate name.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Payload.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl RefreshResponse {
    /// Returns the new credential, preferring the top level.
    pub fn credential(&self) -> Option<String> {
        let nested = |key: &str| {
            self.data
                .as_ref()
                .and_then(|d| d.get(key))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };

        self.token
            .clone()
            .or_else(|| self.access_token.clone())
            .or_else(|| nested("token"))
            .or_else(|| nested("access_token"))
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_validation() {
        assert!(LoginRequest::new("ada_l", "secret1").validate().is_ok());
        assert!(LoginRequest::new("ab", "secret1").validate().is_err());
        assert!(LoginRequest::new("ada_l", "secret").validate().is_err());
    }

    #[test]
    fn test_register_validation() {
        assert!(RegisterRequest::new("ada_l", "ada@example.com", "secret1")
            .validate()
            .is_ok());
        assert!(RegisterRequest::new("ada_l", "ada", "secret1")
            .validate()
            .is_err());
    }

    #[test]
    fn test_login_data_nested_user() {
        let data: LoginData = serde_json::from_str(
            r#"{"token":"a.b.c","user":{"id":1,"username":"ada","role":0}}"#,
        )
        .unwrap();
        assert_eq!(data.token.as_deref(), Some("a.b.c"));
        let user = data.into_user();
        assert_eq!(user.username.as_deref(), Some("ada"));
        assert_eq!(user.role, Some(Role::Admin));
    }

    #[test]
    fn test_login_data_flat_profile() {
        let data: LoginData = serde_json::from_str(
            r#"{"access_token":"x.y.z","id":2,"username":"bob","avatarUrl":"/b.png"}"#,
        )
        .unwrap();
        assert_eq!(data.token.as_deref(), Some("x.y.z"));
        let user = data.into_user();
        assert_eq!(user.id, Some(2));
        assert_eq!(user.avatar_url.as_deref(), Some("/b.png"));
        assert!(user.extra.is_empty());
    }

    #[test]
    fn test_role_data() {
        let data: RoleData = serde_json::from_str(r#"{"role":1}"#).unwrap();
        assert_eq!(data.role, Some(Role::User));
        let data: RoleData = serde_json::from_str("{}").unwrap();
        assert!(data.role.is_none());
    }

    #[test]
    fn test_refresh_credential_locations() {
        let top: RefreshResponse = serde_json::from_str(r#"{"code":200,"token":"t1"}"#).unwrap();
        assert_eq!(top.credential().as_deref(), Some("t1"));

        let alt: RefreshResponse =
            serde_json::from_str(r#"{"code":200,"access_token":"t2"}"#).unwrap();
        assert_eq!(alt.credential().as_deref(), Some("t2"));

        let nested: RefreshResponse =
            serde_json::from_str(r#"{"code":200,"data":{"access_token":"t3"}}"#).unwrap();
        assert_eq!(nested.credential().as_deref(), Some("t3"));

        let none: RefreshResponse = serde_json::from_str(r#"{"code":200,"data":{}}"#).unwrap();
        assert!(none.credential().is_none());
    }
}
