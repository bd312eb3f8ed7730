// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! A scriptable backend. Responses are configured up front with the
//! `with_*` builders or changed mid-test with the `set_*` methods, and every
//! call is recorded for verification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use quill_client::api::{LoginData, LoginRequest, RegisterRequest};
use quill_client::{AuthApi, ClientError, ClientResult, Role, UserInfo};

/// Message the mock returns for rejected credentials.
pub const BAD_CREDENTIALS: &str = "Invalid username or password";

// =============================================================================
// MockAuthApi
// =============================================================================

/// Mock backend.
#[derive(Debug, Default)]
pub struct MockAuthApi {
    role: Mutex<Option<Role>>,
    role_delay: Mutex<Duration>,
    login: Mutex<Option<LoginData>>,
    profile: Mutex<Option<UserInfo>>,
    refresh_token: Mutex<Option<String>>,
    fail_logout: AtomicBool,
    offline: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
}

impl MockAuthApi {
    /// Creates a mock that rejects everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers role queries with `role`.
    pub fn with_role(self, role: Role) -> Self {
        self.set_role(Some(role));
        self
    }

    /// Delays role queries by `delay`.
    pub fn with_role_delay(self, delay: Duration) -> Self {
        *self.role_delay.lock() = delay;
        self
    }

    /// Accepts logins, answering with `token` and `user`.
    pub fn with_login(self, token: Option<String>, user: UserInfo) -> Self {
        *self.login.lock() = Some(LoginData {
            token,
            user: Some(user),
            profile: UserInfo::default(),
        });
        self
    }

    /// Answers profile queries with `user`.
    pub fn with_profile(self, user: UserInfo) -> Self {
        *self.profile.lock() = Some(user);
        self
    }

    /// Answers refreshes with `token`.
    pub fn with_refresh_token(self, token: impl Into<String>) -> Self {
        *self.refresh_token.lock() = Some(token.into());
        self
    }

    /// Makes backend logout fail.
    pub fn failing_logout(self) -> Self {
        self.fail_logout.store(true, Ordering::SeqCst);
        self
    }

    /// Changes the role answer. `None` rejects role queries.
    pub fn set_role(&self, role: Option<Role>) {
        *self.role.lock() = role;
    }

    /// Makes every call fail with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns how many times `name` was called.
    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == name).count()
    }

    /// Returns how many role queries were made.
    pub fn role_calls(&self) -> usize {
        self.calls("fetch_role")
    }

    /// Returns every recorded call, in order.
    pub fn history(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn record(&self, name: &'static str) -> ClientResult<()> {
        self.calls.lock().push(name);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::network("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn fetch_role(&self) -> ClientResult<Role> {
        self.record("fetch_role")?;
        let delay = *self.role_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let role = *self.role.lock();
        role.ok_or_else(|| ClientError::application(401, "Not logged in"))
    }

    async fn login(&self, _request: &LoginRequest) -> ClientResult<LoginData> {
        self.record("login")?;
        self.login
            .lock()
            .clone()
            .ok_or_else(|| ClientError::application(401, BAD_CREDENTIALS))
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<Option<UserInfo>> {
        self.record("register")?;
        if request.username == "taken_name" {
            return Err(ClientError::application(409, "Username already exists"));
        }
        Ok(None)
    }

    async fn user_info(&self) -> ClientResult<UserInfo> {
        self.record("user_info")?;
        self.profile
            .lock()
            .clone()
            .ok_or_else(|| ClientError::application(401, "Not logged in"))
    }

    async fn logout(&self) -> ClientResult<()> {
        self.record("logout")?;
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(ClientError::http(500, "Internal Server Error"));
        }
        Ok(())
    }

    async fn refresh(&self) -> ClientResult<String> {
        self.record("refresh")?;
        self.refresh_token
            .lock()
            .clone()
            .ok_or_else(|| ClientError::application(401, "Token refresh failed"))
    }

    async fn forgot_password(&self, _email: &str) -> ClientResult<()> {
        self.record("forgot_password")?;
        Ok(())
    }
}
