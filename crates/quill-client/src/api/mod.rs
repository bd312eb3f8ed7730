// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Backend API used by the authentication flow.
//!
//! [`AuthApi`] is the seam between the flow and the network: the role
//! resolver, the session and the client facade only talk to the trait, and
//! [`HttpAuthApi`] is the `reqwest` implementation.

mod envelope;
mod http;
mod types;

use async_trait::async_trait;

pub use envelope::{Envelope, SUCCESS_CODE};
pub use http::HttpAuthApi;
pub use types::{
    ForgotPasswordRequest, LoginData, LoginRequest, RefreshResponse, RegisterRequest, RoleData,
};

use crate::auth::{Role, UserInfo};
use crate::error::ClientResult;

// =============================================================================
// Endpoints
// =============================================================================

/// Role of the current user.
pub const ROLE_PATH: &str = "/user/getRole";

/// Sign in.
pub const LOGIN_PATH: &str = "/public/login";

/// Create an account.
pub const REGISTER_PATH: &str = "/public/register";

/// Profile of the current user.
pub const USER_INFO_PATH: &str = "/user/info";

/// Sign out.
pub const LOGOUT_PATH: &str = "/user/logout";

/// Exchange the credential for a fresh one.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Request a password reset email.
pub const FORGOT_PASSWORD_PATH: &str = "/auth/forgot-password";

// =============================================================================
// AuthApi
// =============================================================================

/// Backend calls made by the authentication flow.
///
/// Every method fails with [`ClientError::Application`](crate::ClientError::Application)
/// when the backend answers with a non-success envelope, carrying the
/// backend's message unchanged.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `GET /user/getRole`.
    async fn fetch_role(&self) -> ClientResult<Role>;

    /// `POST /public/login`.
    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginData>;

    /// `POST /public/register`. Returns the created profile when the backend
    /// sends one.
    async fn register(&self, request: &RegisterRequest) -> ClientResult<Option<UserInfo>>;

    /// `GET /user/info`.
    async fn user_info(&self) -> ClientResult<UserInfo>;

    /// `POST /user/logout`.
    async fn logout(&self) -> ClientResult<()>;

    /// `POST /auth/refresh`. Returns the new credential.
    async fn refresh(&self) -> ClientResult<String>;

    /// `POST /auth/forgot-password`.
    async fn forgot_password(&self, email: &str) -> ClientResult<()>;
}
