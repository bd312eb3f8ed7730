// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and resolve `${VAR}` / `${VAR:default}` placeholders
//! 2. Parse YAML, TOML or JSON based on the file extension
//! 3. Apply `QUILL_*` environment overrides
//! 4. Resolve a relative storage path against the config file directory
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! QUILL_API_BASE_URL=https://blog.example.com
//! QUILL_API_TIMEOUT=5s
//! QUILL_ROLE_CACHE_TTL=30s
//! QUILL_STORAGE_PATH=/var/lib/quill/session.json
//! QUILL_LOG_LEVEL=debug
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LogLevel, QuillConfig};

/// Source of environment values. Tests inject a map instead of the process
/// environment.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// # Examples
///
/// ```no_run
/// use quill_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("quill.yaml").unwrap();
/// println!("{}", config.api.api_base_url());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env_prefix: String,
    resolve_env_vars: bool,
    resolve_paths: bool,
}

impl ConfigLoader {
    /// Creates a loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: "QUILL".to_string(),
            resolve_env_vars: true,
            resolve_paths: true,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Enables or disables relative path resolution.
    pub fn with_path_resolution(mut self, enabled: bool) -> Self {
        self.resolve_paths = enabled;
        self
    }

    /// Loads configuration from a file using the process environment.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<QuillConfig> {
        self.load_with_env(path, &|name| env::var(name).ok())
    }

    /// Loads configuration from a file using the given environment lookup.
    pub fn load_with_env(
        &self,
        path: impl AsRef<Path>,
        lookup: EnvLookup<'_>,
    ) -> ConfigResult<QuillConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let format = ConfigFormat::from_path(path)?;

        let mut config = self
            .parse_with(&content, format, lookup)
            .map_err(|e| match e {
                ConfigError::Serialization { message } => ConfigError::parse(path, message),
                other => other,
            })?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config, lookup)?;
        }

        if self.resolve_paths {
            let base = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            if config.storage.path.is_relative() {
                config.storage.path = base.join(&config.storage.path);
            }
        }

        config.validate()?;
        info!("Configuration loaded successfully");
        debug!(api = %config.api.api_base_url(), "Resolved API base URL");

        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<QuillConfig> {
        self.load_from_str_with_env(content, format, &|name| env::var(name).ok())
    }

    /// Loads configuration from a string using the given environment lookup.
    pub fn load_from_str_with_env(
        &self,
        content: &str,
        format: ConfigFormat,
        lookup: EnvLookup<'_>,
    ) -> ConfigResult<QuillConfig> {
        let mut config = self.parse_with(content, format, lookup)?;
        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config, lookup)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn parse_with(
        &self,
        content: &str,
        format: ConfigFormat,
        lookup: EnvLookup<'_>,
    ) -> ConfigResult<QuillConfig> {
        let content = if self.resolve_env_vars {
            resolve_env_placeholders(content, lookup)
        } else {
            content.to_string()
        };

        if content.trim().is_empty() {
            return Ok(QuillConfig::default());
        }

        match format {
            ConfigFormat::Yaml => yaml_parse(&content),
            ConfigFormat::Toml => {
                toml::from_str(&content).map_err(|e| ConfigError::serialization(e.to_string()))
            }
            ConfigFormat::Json => serde_json::from_str(&content)
                .map_err(|e| ConfigError::serialization(e.to_string())),
        }
    }

    fn apply_env_overrides(
        &self,
        config: &mut QuillConfig,
        lookup: EnvLookup<'_>,
    ) -> ConfigResult<()> {
        let var = |suffix: &str| format!("{}_{}", self.env_prefix, suffix);

        if let Some(value) = lookup(&var("API_BASE_URL")) {
            config.api.base_url = value;
        }
        if let Some(value) = lookup(&var("API_PREFIX")) {
            config.api.api_prefix = value;
        }
        if let Some(value) = lookup(&var("API_TIMEOUT")) {
            config.api.timeout = parse_duration(&var("API_TIMEOUT"), &value)?;
        }
        if let Some(value) = lookup(&var("ROLE_CACHE_TTL")) {
            config.auth.role_cache_ttl = parse_duration(&var("ROLE_CACHE_TTL"), &value)?;
        }
        if let Some(value) = lookup(&var("VALIDATE_ON_INIT")) {
            config.auth.validate_on_init = parse_bool(&value);
        }
        if let Some(value) = lookup(&var("STORAGE_PATH")) {
            config.storage.path = PathBuf::from(value);
        }
        if let Some(value) = lookup(&var("COOKIE")) {
            config.storage.cookie = Some(value);
        }
        if let Some(value) = lookup(&var("LOG_LEVEL")) {
            match LogLevel::parse(&value) {
                Some(level) => config.logging.level = level,
                None => warn!("Ignoring unknown log level '{}'", value),
            }
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Replaces `${VAR}` and `${VAR:default}` with environment values.
///
/// Unknown variables without a default are left in place.
fn resolve_env_placeholders(content: &str, lookup: EnvLookup<'_>) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' || chars.peek() != Some(&'{') {
            result.push(c);
            continue;
        }
        chars.next();

        let mut inner = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            inner.push(c);
        }

        if !closed {
            result.push_str("${");
            result.push_str(&inner);
            continue;
        }

        let (name, default) = match inner.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (inner.as_str(), None),
        };

        match (lookup(name), default) {
            (Some(value), _) => result.push_str(&value),
            (None, Some(default)) => result.push_str(default),
            (None, None) => {
                warn!("Environment variable '{}' not found", name);
                result.push_str(&format!("${{{}}}", name));
            }
        }
    }

    result
}

fn parse_duration(name: &str, value: &str) -> ConfigResult<Duration> {
    humantime::parse_duration(value)
        .map_err(|e| ConfigError::invalid_env_var(name, format!("expected a duration: {}", e)))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "enabled"
    )
}

fn yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<QuillConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with default settings.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<QuillConfig> {
    ConfigLoader::new().load_from_str(content, format)
}
