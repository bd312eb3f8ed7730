// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - Token claims and the integer-coded [`Role`]
//! - Read-only token decoding and expiry checks
//! - Cached role resolution against the backend
//! - The persisted user snapshot

mod claims;
pub mod decoder;
mod role;
mod user;

pub use claims::{Claims, Role};
pub use decoder::{decode, TokenInfo, TokenInspector};
pub use role::{RequiredRole, RoleFetch, RoleInfo, RoleResolver};
pub use user::UserInfo;
