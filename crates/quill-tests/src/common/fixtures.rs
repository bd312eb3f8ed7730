// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Tokens are minted with `jsonwebtoken` so the client's decoder is checked
//! against a real encoder rather than hand-built strings.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use quill_client::{Role, UserInfo};
use quill_config::{QuillConfig, StorageBackend};
use serde_json::{json, Value};

/// Signing secret for minted tokens. The client never verifies signatures.
pub const TEST_SECRET: &[u8] = b"quill-test-secret-that-nobody-checks";

// =============================================================================
// Token Fixtures
// =============================================================================

/// Fixture providing signed tokens.
pub struct TokenFixtures;

impl TokenFixtures {
    /// Signs an arbitrary claims object.
    pub fn sign(claims: &Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .expect("Failed to sign token")
    }

    /// A token valid for one hour.
    pub fn valid(user_id: i64, role: Role) -> String {
        let now = Utc::now().timestamp();
        Self::sign(&json!({
            "userId": user_id,
            "role": role.code(),
            "iat": now,
            "exp": now + 3600,
        }))
    }

    /// A token that expired a minute ago.
    pub fn expired(user_id: i64, role: Role) -> String {
        let now = Utc::now().timestamp();
        Self::sign(&json!({
            "userId": user_id,
            "role": role.code(),
            "iat": now - 3660,
            "exp": now - 60,
        }))
    }

    /// A token with a fixed expiry.
    pub fn expiring_at(exp: i64) -> String {
        Self::sign(&json!({ "userId": 1, "role": 1, "exp": exp }))
    }

    /// A token with no `exp` claim.
    pub fn without_exp() -> String {
        Self::sign(&json!({ "userId": 1, "role": 1 }))
    }
}

// =============================================================================
// User Fixtures
// =============================================================================

/// Fixture providing user profiles.
pub struct UserFixtures;

impl UserFixtures {
    /// The blog owner.
    pub fn admin() -> UserInfo {
        UserInfo::new(1, "blog_admin")
            .with_role(Role::Admin)
            .with_email("admin@blog.test")
    }

    /// A regular reader.
    pub fn reader() -> UserInfo {
        UserInfo::new(7, "ada_reader")
            .with_role(Role::User)
            .with_email("ada@blog.test")
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Fixture providing client configurations.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// In-memory configuration pointing at `base_url`.
    pub fn memory(base_url: &str) -> QuillConfig {
        let mut config = QuillConfig::default();
        config.api.base_url = base_url.to_string();
        config.api.timeout = Duration::from_secs(5);
        config.storage.backend = StorageBackend::Memory;
        config
    }

    /// File-backed configuration storing the session under `dir`.
    pub fn file(base_url: &str, dir: &Path) -> QuillConfig {
        let mut config = Self::memory(base_url);
        config.storage.backend = StorageBackend::File;
        config.storage.path = dir.join("session.json");
        config
    }
}
