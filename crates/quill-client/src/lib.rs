// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # quill-client
//!
//! Authentication core of the Quill blog client.
//!
//! ## Components
//!
//! - **Token Store** ([`storage`]): persisted credential and user snapshot
//! - **Token Decoder** ([`auth::decoder`]): claims from a three-part token,
//!   without signature checks
//! - **Role Resolver** ([`RoleResolver`]): backend role with a short cache
//! - **Auth State** ([`AuthSession`]): the sign-in state machine
//! - **Route Guard** ([`RouteGuard`]): allow or redirect before navigation
//!
//! [`QuillClient`] wires them together over an [`AuthApi`].
//!
//! ## Example
//!
//! ```no_run
//! use quill_client::{NavigationDecision, QuillClient};
//! use quill_config::QuillConfig;
//!
//! # async fn run() -> quill_client::ClientResult<()> {
//! let client = QuillClient::from_config(&QuillConfig::default())?;
//! client.init().await;
//!
//! match client.navigate("/settings").await {
//!     NavigationDecision::Allow(route) => println!("open {}", route.path),
//!     NavigationDecision::Redirect(to) => println!("go to {}", to),
//!     NavigationDecision::Superseded => {}
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod guard;
pub mod session;
pub mod storage;
pub mod validation;

pub use api::{AuthApi, HttpAuthApi};
pub use auth::{
    Claims, RequiredRole, Role, RoleFetch, RoleInfo, RoleResolver, TokenInfo, TokenInspector,
    UserInfo,
};
pub use client::{QuillClient, QuillClientBuilder};
pub use error::{ClientError, ClientResult};
pub use guard::{NavigationDecision, Redirect, RedirectReason, RouteGuard, RouteTable};
pub use session::{AuthPhase, AuthSession, AuthSnapshot, SessionOptions};
pub use storage::{CookieJar, CredentialSource, FileStore, KeyValueStore, MemoryStore, TokenStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert_eq!(NAME, "quill-client");
    }
}
