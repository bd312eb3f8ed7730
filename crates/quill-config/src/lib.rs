// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # quill-config
//!
//! Configuration management for the Quill blog client.
//!
//! ## Features
//!
//! - **Schema Definition**: API, auth, route, storage and logging sections
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `QUILL_*` variables and `${VAR:default}` placeholders
//!
//! ## Quick Start
//!
//! ```no_run
//! use quill_config::load_config;
//!
//! let config = load_config("quill.yaml").unwrap();
//! println!("API: {}", config.api.api_base_url());
//! ```
//!
//! ```yaml
//! api:
//!   base_url: "${BLOG_API:http://localhost:8080}"
//!   timeout: 10s
//! auth:
//!   role_cache_ttl: 60s
//!   token_source: storage
//! storage:
//!   backend: file
//!   path: .quill/session.json
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{
    ApiConfig, AuthConfig, LogFormat, LogLevel, LoggingConfig, QuillConfig, RoutesConfig,
    StorageBackend, StorageConfig, TokenSource, DEFAULT_API_PREFIX, DEFAULT_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_ROLE_CACHE_TTL,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert_eq!(NAME, "quill-config");
    }
}
