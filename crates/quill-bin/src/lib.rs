// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # quill-bin
//!
//! Command-line front-end for the Quill blog client.
//!
//! - CLI argument parsing with clap
//! - Logging initialization
//! - Command implementations over `quill-client`
//!
//! ## Usage
//!
//! ```bash
//! # Sign in and persist the session
//! quill login ada_l --password secret1
//!
//! # Who is signed in, and with which role
//! quill whoami
//! quill role --require admin
//!
//! # Ask the route guard about a navigation
//! quill navigate /admin
//!
//! # Inspect a token without verifying it
//! quill decode eyJhbGciOi...
//!
//! # Validate configuration
//! quill -c quill.yaml validate
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
