// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `login` / `register` / `logout` / `refresh` / `forgot-password`: account flows
//! - `whoami` / `role`: session and role inspection
//! - `navigate`: run the route guard for a path
//! - `decode`: show the claims of a token
//! - `validate` / `version`: tooling

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Quill - blog client authentication
///
/// Signs in against the blog backend, keeps the session on disk, and answers
/// the same access questions the web client asks before each navigation.
#[derive(Parser, Debug)]
#[command(
    name = "quill",
    author = "Sylvex <contact@sylvex.io>",
    version = quill_client::VERSION,
    about = "Blog client authentication",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "quill.yaml",
        env = "QUILL_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error). Defaults to `logging.level`
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact). Defaults to `logging.format`
    #[arg(long, env = "QUILL_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Output format for command results
    #[arg(short, long, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Enable quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the Quill CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sign in and persist the session
    Login(LoginArgs),

    /// Create an account
    Register(RegisterArgs),

    /// Sign out and clear the persisted session
    Logout,

    /// Exchange the credential for a fresh one
    Refresh,

    /// Request a password reset email
    #[command(name = "forgot-password")]
    ForgotPassword(ForgotPasswordArgs),

    /// Show the signed-in user
    Whoami(WhoamiArgs),

    /// Show the current role as resolved by the backend
    Role(RoleArgs),

    /// Run the route guard for a path
    Navigate(NavigateArgs),

    /// Show the claims of a token without verifying it
    Decode(DecodeArgs),

    /// Validate the configuration file
    Validate(ValidateArgs),

    /// Show version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `login` command.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Username
    pub username: String,

    /// Password
    #[arg(short, long, env = "QUILL_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the `register` command.
#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Username
    pub username: String,

    /// Email address
    #[arg(short, long)]
    pub email: String,

    /// Password
    #[arg(short, long, env = "QUILL_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the `forgot-password` command.
#[derive(Args, Debug, Clone)]
pub struct ForgotPasswordArgs {
    /// Account email
    pub email: String,
}

/// Arguments for the `whoami` command.
#[derive(Args, Debug, Clone, Default)]
pub struct WhoamiArgs {
    /// Fetch the profile from the backend instead of the stored snapshot
    #[arg(long)]
    pub remote: bool,
}

/// Arguments for the `role` command.
#[derive(Args, Debug, Clone, Default)]
pub struct RoleArgs {
    /// Fail unless the role satisfies this level
    #[arg(short, long)]
    pub require: Option<RoleRequirement>,
}

/// Arguments for the `navigate` command.
#[derive(Args, Debug, Clone)]
pub struct NavigateArgs {
    /// Path with optional query, e.g. `/settings?tab=profile`
    pub path: String,
}

/// Arguments for the `decode` command.
#[derive(Args, Debug, Clone, Default)]
pub struct DecodeArgs {
    /// Token to decode (default: the stored credential)
    pub token: Option<String>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

/// Role level accepted by `role --require`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RoleRequirement {
    /// Administrators only
    Admin,
    /// Any signed-in user
    User,
}

impl From<quill_config::LogFormat> for LogFormat {
    fn from(value: quill_config::LogFormat) -> Self {
        match value {
            quill_config::LogFormat::Text => LogFormat::Text,
            quill_config::LogFormat::Json => LogFormat::Json,
            quill_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

impl From<RoleRequirement> for quill_client::RequiredRole {
    fn from(value: RoleRequirement) -> Self {
        match value {
            RoleRequirement::Admin => quill_client::RequiredRole::Admin,
            RoleRequirement::User => quill_client::RequiredRole::User,
        }
    }
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Get the log level requested on the command line, if any.
    pub fn effective_log_level(&self) -> Option<&str> {
        if self.quiet {
            Some("error")
        } else if self.verbose {
            Some("debug")
        } else {
            self.log_level.as_deref()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
