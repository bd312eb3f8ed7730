// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Pre-navigation route guard.
//!
//! Before each navigation the guard sets the page title and applies, in
//! order, first match wins:
//!
//! 1. guest-only target while signed in: redirect to the landing page
//! 2. target requiring sign-in while signed out: redirect to the login page
//!    with the requested path in the `redirect` query parameter
//! 3. admin-only target: ask the role resolver; anything but administrator
//!    redirects to the unauthorized page
//! 4. allow
//!
//! Every navigation gets an increasing id. A decision that resolves after a
//! newer navigation has started is reported as
//! [`NavigationDecision::Superseded`] and must not be applied.

mod route;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use quill_config::RoutesConfig;
use tracing::{debug, info};

pub use route::{Route, RouteMatch, RouteMeta, RouteTable};

use crate::auth::RoleResolver;
use crate::session::AuthSession;

/// Characters left unescaped in query values.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

// =============================================================================
// Decisions
// =============================================================================

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedirectReason {
    /// Guest-only page while signed in.
    GuestOnly,
    /// Page requires sign-in.
    LoginRequired,
    /// Page requires an administrator.
    AdminRequired,
}

/// A redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Target path.
    pub path: String,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// Cause.
    pub reason: RedirectReason,
}

impl Redirect {
    /// Renders the target as a URL path with an encoded query.
    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, QUERY_VALUE),
                    utf8_percent_encode(v, QUERY_VALUE)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

impl std::fmt::Display for Redirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// Outcome of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Proceed to the target.
    Allow(RouteMatch),
    /// Go elsewhere instead.
    Redirect(Redirect),
    /// A newer navigation started while this one was being decided.
    Superseded,
}

impl NavigationDecision {
    /// Returns `true` for [`NavigationDecision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, NavigationDecision::Allow(_))
    }

    /// Returns the redirect, if any.
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            NavigationDecision::Redirect(r) => Some(r),
            _ => None,
        }
    }
}

// =============================================================================
// RouteGuard
// =============================================================================

/// Decides every navigation against the session and the role resolver.
pub struct RouteGuard {
    session: Arc<AuthSession>,
    roles: Arc<RoleResolver>,
    table: RouteTable,
    config: RoutesConfig,
    navigation: AtomicU64,
    title: RwLock<String>,
}

impl RouteGuard {
    /// Creates a guard over `table`.
    pub fn new(
        session: Arc<AuthSession>,
        roles: Arc<RoleResolver>,
        table: RouteTable,
        config: RoutesConfig,
    ) -> Self {
        let title = RwLock::new(config.site_title.clone());
        Self {
            session,
            roles,
            table,
            config,
            navigation: AtomicU64::new(0),
            title,
        }
    }

    /// Returns the route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Returns the current page title.
    pub fn document_title(&self) -> String {
        self.title.read().clone()
    }

    /// Returns the id of the latest navigation.
    pub fn current_navigation(&self) -> u64 {
        self.navigation.load(Ordering::SeqCst)
    }

    /// Decides a navigation to `full_path`.
    pub async fn before_each(&self, full_path: &str) -> NavigationDecision {
        let id = self.navigation.fetch_add(1, Ordering::SeqCst) + 1;
        let decision = self.decide(full_path).await;

        if self.current_navigation() != id {
            debug!(id, path = full_path, "Navigation superseded");
            return NavigationDecision::Superseded;
        }
        decision
    }

    async fn decide(&self, full_path: &str) -> NavigationDecision {
        let Some(target) = self.table.resolve(full_path) else {
            // Unmatched paths are treated as unrestricted.
            debug!(path = full_path, "No route matched");
            return NavigationDecision::Allow(RouteMatch {
                name: None,
                pattern: String::new(),
                path: full_path.to_string(),
                full_path: full_path.to_string(),
                params: Default::default(),
                query: Vec::new(),
                matched: Vec::new(),
            });
        };

        if let Some(title) = target.title() {
            *self.title.write() = format!("{} - {}", title, self.config.site_title);
        }

        let signed_in = self.session.is_logged_in();

        if target.is_guest_only() && signed_in {
            return self.redirect(
                full_path,
                self.config.landing_path.clone(),
                Vec::new(),
                RedirectReason::GuestOnly,
            );
        }

        if target.requires_auth() && !signed_in {
            return self.redirect(
                full_path,
                self.config.login_path.clone(),
                vec![(self.config.redirect_param.clone(), full_path.to_string())],
                RedirectReason::LoginRequired,
            );
        }

        if target.requires_admin() && !self.roles.is_admin().await {
            return self.redirect(
                full_path,
                self.config.unauthorized_path.clone(),
                Vec::new(),
                RedirectReason::AdminRequired,
            );
        }

        debug!(path = full_path, route = target.name.as_deref().unwrap_or(""), "Navigation allowed");
        NavigationDecision::Allow(target)
    }

    fn redirect(
        &self,
        from: &str,
        path: String,
        query: Vec<(String, String)>,
        reason: RedirectReason,
    ) -> NavigationDecision {
        let redirect = Redirect {
            path,
            query,
            reason,
        };
        info!(from, to = %redirect, ?reason, "Navigation redirected");
        NavigationDecision::Redirect(redirect)
    }
}

impl std::fmt::Debug for RouteGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGuard")
            .field("routes", &self.table.len())
            .field("navigation", &self.current_navigation())
            .finish_non_exhaustive()
    }
}
