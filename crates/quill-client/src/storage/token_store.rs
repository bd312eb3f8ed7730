// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Credential and user snapshot persistence.

use std::sync::Arc;

use tracing::warn;

use super::{CredentialSource, KeyValueStore, TOKEN_KEY, USER_INFO_KEY};
use crate::auth::UserInfo;
use crate::error::{ClientError, ClientResult};

/// Persists the credential and the user snapshot.
///
/// Stored data is plaintext and is not validated on read beyond being JSON.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    /// Creates a token store over a key-value backend.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Credential
    // =========================================================================

    /// Stores the credential.
    pub fn save_token(&self, token: &str) -> ClientResult<()> {
        self.store.set(TOKEN_KEY, token)
    }

    /// Returns the stored credential.
    pub fn token(&self) -> ClientResult<Option<String>> {
        self.store.get(TOKEN_KEY)
    }

    /// Removes the credential.
    pub fn clear_token(&self) -> ClientResult<()> {
        self.store.remove(TOKEN_KEY)
    }

    /// Returns `true` when a credential is stored.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    // =========================================================================
    // User snapshot
    // =========================================================================

    /// Stores the user snapshot.
    pub fn save(&self, user: &UserInfo) -> ClientResult<()> {
        let json = serde_json::to_string(user).map_err(|e| ClientError::storage(e.to_string()))?;
        self.store.set(USER_INFO_KEY, &json)
    }

    /// Returns the stored user snapshot.
    ///
    /// Any JSON object loads, including ones missing every known field. Text
    /// that is not a JSON object is a storage error.
    pub fn load(&self) -> ClientResult<Option<UserInfo>> {
        match self.store.get(USER_INFO_KEY)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| ClientError::storage(format!("unreadable user record: {}", e))),
        }
    }

    /// Returns the stored user record as raw JSON.
    pub fn load_raw(&self) -> ClientResult<Option<serde_json::Value>> {
        match self.store.get(USER_INFO_KEY)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| ClientError::storage(format!("unreadable user record: {}", e))),
        }
    }

    /// Removes the user snapshot.
    pub fn clear(&self) -> ClientResult<()> {
        self.store.remove(USER_INFO_KEY)
    }

    /// Removes the credential and the user snapshot.
    ///
    /// Both removals are attempted even if the first fails.
    pub fn logout(&self) -> ClientResult<()> {
        let token = self.clear_token();
        let user = self.clear();
        token.and(user)
    }
}

impl CredentialSource for TokenStore {
    fn credential(&self) -> Option<String> {
        match self.token() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read credential");
                None
            }
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}
