// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication state machine.
//!
//! ```text
//! Uninitialized ──init──▶ Loading ──▶ Authenticated
//!                                 └─▶ Anonymous
//! Authenticated ──logout──▶ Anonymous
//! any ──login──▶ Authenticated
//! ```
//!
//! A snapshot is published to subscribers after every transition.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::{RoleFetch, RoleResolver, UserInfo};
use crate::error::ClientResult;
use crate::storage::{CredentialSource, TokenStore};

// =============================================================================
// AuthPhase / AuthSnapshot
// =============================================================================

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthPhase {
    /// `init` has not run yet.
    Uninitialized,
    /// `init` is restoring the persisted session.
    Loading,
    /// A user is signed in.
    Authenticated,
    /// Nobody is signed in.
    Anonymous,
}

impl AuthPhase {
    /// Returns the phase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPhase::Uninitialized => "uninitialized",
            AuthPhase::Loading => "loading",
            AuthPhase::Authenticated => "authenticated",
            AuthPhase::Anonymous => "anonymous",
        }
    }
}

impl std::fmt::Display for AuthPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of the session.
///
/// Only constructible through the transitions below, so a signed-in snapshot
/// always carries a user.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSnapshot {
    phase: AuthPhase,
    user: Option<UserInfo>,
}

impl AuthSnapshot {
    fn uninitialized() -> Self {
        Self {
            phase: AuthPhase::Uninitialized,
            user: None,
        }
    }

    fn loading_phase() -> Self {
        Self {
            phase: AuthPhase::Loading,
            user: None,
        }
    }

    fn authenticated(user: UserInfo) -> Self {
        Self {
            phase: AuthPhase::Authenticated,
            user: Some(user),
        }
    }

    fn anonymous() -> Self {
        Self {
            phase: AuthPhase::Anonymous,
            user: None,
        }
    }

    /// Returns the phase.
    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    /// Returns `true` if a user is signed in.
    pub fn is_logged_in(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }

    /// Returns `true` until `init` has finished.
    pub fn loading(&self) -> bool {
        matches!(self.phase, AuthPhase::Uninitialized | AuthPhase::Loading)
    }

    /// Returns the signed-in user.
    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }
}

// =============================================================================
// AuthSession
// =============================================================================

/// Session settings.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Probe the backend before trusting a restored session.
    pub validate_on_init: bool,
    /// Avatar shown when the user has none.
    pub default_avatar: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            validate_on_init: true,
            default_avatar: "/default-avatar.jpg".to_string(),
        }
    }
}

/// Owned authentication state.
///
/// The session is the only writer of the persisted credential and user
/// snapshot, and the only caller of [`RoleResolver::clear_cache`] on sign-in
/// and sign-out.
pub struct AuthSession {
    store: TokenStore,
    credentials: Arc<dyn CredentialSource>,
    roles: Arc<RoleResolver>,
    options: SessionOptions,
    state: watch::Sender<AuthSnapshot>,
    // Bumped by login and logout; a restore that started earlier is stale.
    generation: AtomicU64,
}

impl AuthSession {
    /// Creates a session in the `Uninitialized` phase.
    pub fn new(
        store: TokenStore,
        credentials: Arc<dyn CredentialSource>,
        roles: Arc<RoleResolver>,
        options: SessionOptions,
    ) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::uninitialized());
        Self {
            store,
            credentials,
            roles,
            options,
            state,
            generation: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Restores the persisted session.
    ///
    /// With a stored user record and probing enabled, the backend is asked
    /// for the current role; any failure purges the stored data. Without a
    /// record the session becomes anonymous.
    ///
    /// A login or logout that happens while the probe is in flight wins: the
    /// restore then leaves state and storage alone.
    pub async fn init(&self) -> AuthSnapshot {
        let generation = self.generation.load(Ordering::SeqCst);
        self.publish(AuthSnapshot::loading_phase());

        let user = match self.store.load() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Stored session unreadable, discarding");
                self.purge();
                None
            }
        };

        let Some(user) = user else {
            debug!("No stored session");
            return self.publish(AuthSnapshot::anonymous());
        };

        if self.credentials.credential().is_none() {
            debug!("Stored user has no credential");
        }

        if self.options.validate_on_init {
            self.roles.clear_cache();
            loop {
                let probe = self.roles.resolve().await;
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!("Session changed during restore, keeping it");
                    return self.snapshot();
                }
                match probe {
                    RoleFetch::Resolved(_) => break,
                    RoleFetch::Failed => {
                        warn!("Stored session rejected by backend, signing out");
                        self.purge();
                        return self.publish(AuthSnapshot::anonymous());
                    }
                    RoleFetch::Discarded => debug!("Restore probe discarded, probing again"),
                }
            }
        }

        info!(user = user.username.as_deref().unwrap_or(""), "Session restored");
        self.publish(AuthSnapshot::authenticated(user))
    }

    /// Signs in.
    ///
    /// The in-memory state changes first; a persistence failure leaves the
    /// session signed in for this process and is returned to the caller.
    pub fn login(&self, credential: Option<&str>, user: UserInfo) -> ClientResult<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.roles.clear_cache();
        info!(user = user.username.as_deref().unwrap_or(""), "Signed in");
        self.publish(AuthSnapshot::authenticated(user.clone()));

        let persisted = match credential {
            Some(token) => self.store.save_token(token),
            None => Ok(()),
        }
        .and_then(|_| self.store.save(&user));

        if let Err(e) = &persisted {
            warn!(error = %e, "Failed to persist session");
        }
        persisted
    }

    /// Signs out, dropping the cached role and the persisted session.
    pub fn logout(&self) -> ClientResult<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.roles.clear_cache();
        self.publish(AuthSnapshot::anonymous());
        info!("Signed out");
        self.store.logout()
    }

    /// Replaces the signed-in user's record and persists it.
    ///
    /// Does nothing when signed out.
    pub fn update_user(&self, user: UserInfo) -> ClientResult<()> {
        if !self.is_logged_in() {
            debug!("Ignoring profile update while signed out");
            return Ok(());
        }
        self.store.save(&user)?;
        self.publish(AuthSnapshot::authenticated(user));
        Ok(())
    }

    /// Changes the signed-in user's avatar and persists it.
    ///
    /// Does nothing when signed out.
    pub fn update_avatar(&self, url: impl Into<String>) -> ClientResult<()> {
        let Some(mut user) = self.user() else {
            debug!("Ignoring avatar update while signed out");
            return Ok(());
        };
        user.avatar_url = Some(url.into());
        self.update_user(user)
    }

    fn publish(&self, snapshot: AuthSnapshot) -> AuthSnapshot {
        debug!(phase = %snapshot.phase, "Auth state changed");
        self.state.send_replace(snapshot.clone());
        snapshot
    }

    fn purge(&self) {
        if let Err(e) = self.store.logout() {
            warn!(error = %e, "Failed to clear stored session");
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> AuthPhase {
        self.state.borrow().phase
    }

    /// Returns `true` if a user is signed in.
    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in()
    }

    /// Returns `true` until `init` has finished.
    pub fn loading(&self) -> bool {
        self.state.borrow().loading()
    }

    /// Returns the signed-in user.
    pub fn user(&self) -> Option<UserInfo> {
        self.state.borrow().user.clone()
    }

    /// Returns the signed-in user's name, or an empty string.
    pub fn username(&self) -> String {
        self.state
            .borrow()
            .user
            .as_ref()
            .and_then(|u| u.username.clone())
            .unwrap_or_default()
    }

    /// Returns the signed-in user's avatar, or the default avatar.
    pub fn avatar(&self) -> String {
        self.state
            .borrow()
            .user
            .as_ref()
            .and_then(|u| u.avatar_url.clone())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.options.default_avatar.clone())
    }

    /// Returns the role resolver.
    pub fn roles(&self) -> &Arc<RoleResolver> {
        &self.roles
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("phase", &self.phase())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
