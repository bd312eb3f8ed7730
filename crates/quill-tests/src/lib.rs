// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Quill Integration Tests
//!
//! Integration tests for the Quill blog client, plus the fixtures and
//! mocks they share.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Signed tokens, users and configurations
//!   - `mocks`: A scriptable [`quill_client::AuthApi`] implementation
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p quill-tests
//!
//! # Run specific test suite
//! cargo test -p quill-tests --test integration_auth
//! cargo test -p quill-tests --test integration_session
//! cargo test -p quill-tests --test integration_guard
//! cargo test -p quill-tests --test integration_config
//! cargo test -p quill-tests --test integration_http
//! ```
//!
//! ## Test Categories
//!
//! ### Auth Tests (`integration_auth.rs`)
//! - Token decoding and expiry
//! - Role resolution and the role cache
//!
//! ### Session Tests (`integration_session.rs`)
//! - Startup restore and validation
//! - Login, logout and profile updates through the client
//! - Persistence across client instances
//!
//! ### Guard Tests (`integration_guard.rs`)
//! - Route matching and metadata
//! - Redirect rules and document titles
//!
//! ### Config Tests (`integration_config.rs`)
//! - Parsing, defaults and environment overrides
//!
//! ### HTTP Tests (`integration_http.rs`)
//! - The reqwest-backed API against a mock server
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use quill_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let api = MockAuthApi::new().with_role(Role::Admin);
//!     let token = TokenFixtures::valid(7, Role::Admin);
//!     // ... test logic
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;
    pub use crate::common::{init_test_logging, temp_test_dir};
}
