// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session storage.
//!
//! This module provides:
//! - A string key-value store abstraction with memory and file backends
//! - [`TokenStore`], which keeps the credential and the user snapshot
//! - [`CookieJar`], the cookie-backed credential source

mod cookie;
mod file;
mod memory;
mod token_store;

use std::sync::Arc;

use quill_config::{StorageBackend, StorageConfig};

pub use cookie::CookieJar;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use token_store::TokenStore;

use crate::error::ClientResult;

/// Storage key for the credential.
pub const TOKEN_KEY: &str = "jwt_token";

/// Storage key for the user snapshot.
pub const USER_INFO_KEY: &str = "user_info";

/// Cookie carrying the credential in the cookie-sourced setup.
pub const TOKEN_COOKIE: &str = "jwt_token";

/// Storage key for a persistent [`CookieJar`].
pub const COOKIE_JAR_KEY: &str = "cookie_jar";

/// String-valued key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value for `key`.
    fn get(&self, key: &str) -> ClientResult<Option<String>>;

    /// Stores `value` under `key`.
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// Anything that can supply the current credential.
pub trait CredentialSource: Send + Sync {
    /// Returns the credential, or `None` when signed out.
    fn credential(&self) -> Option<String>;
}

/// Opens the store selected by `config`.
pub fn open_store(config: &StorageConfig) -> ClientResult<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::File => Ok(Arc::new(FileStore::open(&config.path)?)),
    }
}
