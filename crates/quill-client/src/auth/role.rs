// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role resolution with a short-lived cache.
//!
//! The backend is the only authority on the current user's role. A fetched
//! role is reused for a fixed window, then fetched again. Failures are never
//! cached and every check fails closed.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::Role;
use crate::api::AuthApi;

/// Role name reported when no role could be resolved.
pub const SIGNED_OUT_ROLE_NAME: &str = "Not signed in";

// =============================================================================
// RequiredRole
// =============================================================================

/// Access level an action asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequiredRole {
    /// Administrators only.
    Admin,
    /// Any signed-in user. Administrators qualify too.
    #[default]
    User,
}

impl RequiredRole {
    /// Returns the level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredRole::Admin => "admin",
            RequiredRole::User => "user",
        }
    }

    /// Returns `true` if `role` satisfies this level.
    pub fn is_satisfied_by(&self, role: Role) -> bool {
        match self {
            RequiredRole::Admin => role.is_admin(),
            RequiredRole::User => role.is_user() || role.is_admin(),
        }
    }
}

impl FromStr for RequiredRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(RequiredRole::Admin),
            "user" => Ok(RequiredRole::User),
            other => Err(format!("unknown role requirement: {}", other)),
        }
    }
}

impl std::fmt::Display for RequiredRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RoleInfo
// =============================================================================

/// Summary of the resolved role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInfo {
    /// Resolved role, `None` when resolution failed.
    pub role: Option<Role>,
    /// Display name.
    pub role_name: String,
    /// Whether the role is administrator.
    pub is_admin: bool,
    /// Whether the role is regular user.
    pub is_user: bool,
}

impl RoleInfo {
    /// Builds the summary for a resolution result.
    pub fn from_role(role: Option<Role>) -> Self {
        match role {
            None => Self {
                role: None,
                role_name: SIGNED_OUT_ROLE_NAME.to_string(),
                is_admin: false,
                is_user: false,
            },
            Some(role) => Self {
                role: Some(role),
                role_name: role.name().to_string(),
                is_admin: role.is_admin(),
                is_user: role.is_user(),
            },
        }
    }

    /// Returns `true` if the summary satisfies `required`.
    pub fn satisfies(&self, required: RequiredRole) -> bool {
        self.role.is_some_and(|r| required.is_satisfied_by(r))
    }
}

// =============================================================================
// RoleResolver
// =============================================================================

/// Outcome of a single role lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFetch {
    /// The backend (or the cache) returned a role.
    Resolved(Role),
    /// The backend call failed.
    Failed,
    /// The cache was cleared while the call was in flight.
    Discarded,
}

impl RoleFetch {
    /// Returns the role, if one was resolved.
    pub fn role(self) -> Option<Role> {
        match self {
            RoleFetch::Resolved(role) => Some(role),
            RoleFetch::Failed | RoleFetch::Discarded => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedRole {
    role: Role,
    fetched_at: Instant,
}

/// Resolves the current user's role through the backend.
///
/// One cache slot per resolver. A cached role is trusted while
/// `now - fetched_at < ttl`. [`clear_cache`](Self::clear_cache) also
/// discards the result of any fetch still in flight.
pub struct RoleResolver {
    api: Arc<dyn AuthApi>,
    ttl: Duration,
    cache: Mutex<Option<CachedRole>>,
    // Bumped on every clear; a fetch only caches if the epoch is unchanged.
    epoch: AtomicU64,
}

impl RoleResolver {
    /// Creates a resolver with the given cache window.
    pub fn new(api: Arc<dyn AuthApi>, ttl: Duration) -> Self {
        Self {
            api,
            ttl,
            cache: Mutex::new(None),
            epoch: AtomicU64::new(0),
        }
    }

    /// Returns the cache window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached role if it is still fresh.
    pub fn cached_role(&self) -> Option<Role> {
        let cache = self.cache.lock();
        cache
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.role)
    }

    /// Returns the current role, from cache or from the backend.
    ///
    /// Returns `None` on any failure, including a response without a role.
    pub async fn fetch_role(&self) -> Option<Role> {
        self.resolve().await.role()
    }

    /// Like [`fetch_role`](Self::fetch_role), but reports why no role was
    /// returned.
    pub async fn resolve(&self) -> RoleFetch {
        if let Some(role) = self.cached_role() {
            debug!(role = role.code(), "Using cached role");
            return RoleFetch::Resolved(role);
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        let started = Instant::now();
        debug!("Fetching role from backend");

        match self.api.fetch_role().await {
            Ok(role) => {
                let mut cache = self.cache.lock();
                if self.epoch.load(Ordering::SeqCst) != epoch {
                    debug!("Role cache cleared during fetch, discarding result");
                    return RoleFetch::Discarded;
                }
                *cache = Some(CachedRole {
                    role,
                    fetched_at: started,
                });
                debug!(role = role.code(), "Role fetched");
                RoleFetch::Resolved(role)
            }
            Err(e) => {
                warn!(error = %e, "Role fetch failed");
                RoleFetch::Failed
            }
        }
    }

    /// Drops the cached role.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        *cache = None;
        debug!("Role cache cleared");
    }

    /// Returns `true` if the current role is administrator.
    pub async fn is_admin(&self) -> bool {
        self.fetch_role().await.is_some_and(|r| r.is_admin())
    }

    /// Returns `true` if the current role is regular user.
    pub async fn is_user(&self) -> bool {
        self.fetch_role().await.is_some_and(|r| r.is_user())
    }

    /// Returns a summary of the current role.
    pub async fn role_info(&self) -> RoleInfo {
        RoleInfo::from_role(self.fetch_role().await)
    }

    /// Returns `true` if the current role satisfies `required`.
    pub async fn has_permission(&self, required: RequiredRole) -> bool {
        self.role_info().await.satisfies(required)
    }

    /// Runs `on_granted` if the current role satisfies `required`, otherwise
    /// `on_denied` with the resolved role summary.
    pub async fn check_and_run<T>(
        &self,
        required: RequiredRole,
        on_granted: impl FnOnce() -> T,
        on_denied: impl FnOnce(RoleInfo) -> T,
    ) -> T {
        let info = self.role_info().await;
        if info.satisfies(required) {
            on_granted()
        } else {
            debug!(required = %required, role = %info.role_name, "Permission denied");
            on_denied(info)
        }
    }
}

impl std::fmt::Debug for RoleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleResolver")
            .field("ttl", &self.ttl)
            .field("cached", &self.cache.lock().is_some())
            .finish()
    }
}
