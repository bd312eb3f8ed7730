// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema for the Quill client.
//!
//! Every section has defaults matching the reference backend deployment, so an
//! empty file is a valid configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default backend origin.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default API path prefix.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Default role cache lifetime.
pub const DEFAULT_ROLE_CACHE_TTL: Duration = Duration::from_secs(60);

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// QuillConfig
// =============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
    /// Backend API settings.
    pub api: ApiConfig,
    /// Authentication flow settings.
    pub auth: AuthConfig,
    /// Navigation targets used by the route guard.
    pub routes: RoutesConfig,
    /// Session storage settings.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl QuillConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.api.validate()?;
        self.auth.validate()?;
        self.routes.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

// =============================================================================
// ApiConfig
// =============================================================================

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend origin, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Path prefix prepended to every endpoint.
    pub api_prefix: String,
    /// Per-request timeout.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Optional `User-Agent` override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: None,
        }
    }
}

impl ApiConfig {
    /// Returns the full API base URL (origin plus prefix).
    pub fn api_base_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.api_prefix.trim_end_matches('/')
        )
    }

    /// Returns the base URL for static assets such as avatars.
    pub fn static_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::validation("api.base_url", "cannot be empty"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "api.base_url",
                "must start with http:// or https://",
            ));
        }
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(ConfigError::validation("api.api_prefix", "must start with '/'"));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::validation("api.timeout", "must be greater than zero"));
        }
        Ok(())
    }
}

// =============================================================================
// AuthConfig
// =============================================================================

/// Where the credential is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSource {
    /// Persisted session storage under the `jwt_token` key.
    #[default]
    Storage,
    /// A `jwt_token` cookie.
    Cookie,
}

/// Authentication flow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// How long a fetched role is reused before asking the backend again.
    #[serde(with = "humantime_serde")]
    pub role_cache_ttl: Duration,
    /// Re-validate a persisted session against the backend on startup.
    pub validate_on_init: bool,
    /// Credential source.
    pub token_source: TokenSource,
    /// Avatar shown when the user has none.
    pub default_avatar: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            role_cache_ttl: DEFAULT_ROLE_CACHE_TTL,
            validate_on_init: true,
            token_source: TokenSource::Storage,
            default_avatar: "/default-avatar.jpg".to_string(),
        }
    }
}

impl AuthConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.role_cache_ttl.is_zero() {
            return Err(ConfigError::validation(
                "auth.role_cache_ttl",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// RoutesConfig
// =============================================================================

/// Navigation targets and page title settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Site name appended to page titles.
    pub site_title: String,
    /// Where signed-in users are sent from guest-only pages.
    pub landing_path: String,
    /// Login page.
    pub login_path: String,
    /// Page shown when an admin check fails.
    pub unauthorized_path: String,
    /// Query parameter carrying the originally requested path.
    pub redirect_param: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            site_title: "My Blog".to_string(),
            landing_path: "/".to_string(),
            login_path: "/login".to_string(),
            unauthorized_path: "/403".to_string(),
            redirect_param: "redirect".to_string(),
        }
    }
}

impl RoutesConfig {
    fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("routes.landing_path", &self.landing_path),
            ("routes.login_path", &self.login_path),
            ("routes.unauthorized_path", &self.unauthorized_path),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::validation(field, "must start with '/'"));
            }
        }
        if self.redirect_param.is_empty() {
            return Err(ConfigError::validation("routes.redirect_param", "cannot be empty"));
        }
        Ok(())
    }
}

// =============================================================================
// StorageConfig
// =============================================================================

/// Session storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON file on disk.
    #[default]
    File,
    /// In-process only; lost on exit.
    Memory,
}

/// Session storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend kind.
    pub backend: StorageBackend,
    /// File path for the `file` backend.
    pub path: PathBuf,
    /// Raw `Cookie` header used when `auth.token_source` is `cookie`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: PathBuf::from("quill-session.json"),
            cookie: None,
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.backend == StorageBackend::File && self.path.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "storage.path",
                "required for the file backend",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// LoggingConfig
// =============================================================================

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the filter directive for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name, accepting `warning` as an alias.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Compact single-line text.
    Compact,
    /// JSON lines.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
}
