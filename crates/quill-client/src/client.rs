// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client facade tying the flow together.

use std::sync::Arc;
use std::time::Duration;

use quill_config::{QuillConfig, RoutesConfig, TokenSource, DEFAULT_ROLE_CACHE_TTL};
use tracing::{debug, info, warn};

use crate::api::{AuthApi, HttpAuthApi, LoginRequest, RegisterRequest};
use crate::auth::{decode, RoleResolver, TokenInspector, UserInfo};
use crate::error::{ClientError, ClientResult};
use crate::guard::{NavigationDecision, RouteGuard, RouteTable};
use crate::session::{AuthSession, AuthSnapshot, SessionOptions};
use crate::storage::{open_store, CookieJar, CredentialSource, KeyValueStore, MemoryStore, TokenStore};
use crate::validation::validate_email;

// =============================================================================
// QuillClient
// =============================================================================

/// Authentication client for the blog.
///
/// Owns the token store, role resolver, session and route guard, and runs
/// the sign-in, registration, sign-out and refresh flows over an [`AuthApi`].
pub struct QuillClient {
    api: Arc<dyn AuthApi>,
    store: TokenStore,
    cookies: Option<Arc<CookieJar>>,
    inspector: TokenInspector,
    roles: Arc<RoleResolver>,
    session: Arc<AuthSession>,
    guard: Arc<RouteGuard>,
}

impl QuillClient {
    /// Creates a builder.
    pub fn builder() -> QuillClientBuilder {
        QuillClientBuilder::new()
    }

    /// Creates a client talking HTTP to the configured backend.
    pub fn from_config(config: &QuillConfig) -> ClientResult<Self> {
        let backend = open_store(&config.storage)?;
        let store = TokenStore::new(backend.clone());
        // Cookies are saved alongside the session.
        let cookies = match config.auth.token_source {
            TokenSource::Storage => None,
            TokenSource::Cookie => Some(Arc::new(CookieJar::persistent(
                backend,
                config.storage.cookie.as_deref().unwrap_or_default(),
            ))),
        };
        let credentials: Arc<dyn CredentialSource> = match &cookies {
            Some(jar) => jar.clone(),
            None => Arc::new(store.clone()),
        };

        let mut api = HttpAuthApi::new(&config.api, credentials)?;
        if let Some(jar) = &cookies {
            api = api.with_cookie_jar(jar.clone());
        }

        let mut builder = Self::builder()
            .api(Arc::new(api))
            .token_store(store)
            .role_cache_ttl(config.auth.role_cache_ttl)
            .validate_on_init(config.auth.validate_on_init)
            .default_avatar(config.auth.default_avatar.clone())
            .routes(config.routes.clone());
        if let Some(jar) = cookies {
            builder = builder.cookie_jar(jar);
        }
        builder.build()
    }

    // =========================================================================
    // Flows
    // =========================================================================

    /// Restores the persisted session.
    pub async fn init(&self) -> AuthSnapshot {
        self.session.init().await
    }

    /// Validates the input, signs in and records the session.
    ///
    /// Profile fields the response omits are filled from the token claims.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserInfo> {
        let request = LoginRequest::new(username, password);
        request.validate()?;

        let data = self.api.login(&request).await?;
        let token = data.token.clone();
        let mut user = data.into_user();

        if token.is_none() && self.cookies.is_none() {
            return Err(ClientError::malformed_response("login response has no token"));
        }

        if let Some(claims) = token.as_deref().and_then(|t| decode(t).ok()) {
            user.id = user.id.or(claims.user_id);
            user.role = user.role.or(claims.role);
        }
        if user.username.is_none() {
            user.username = Some(username.to_string());
        }

        // Cookie-issued credentials stay in the jar.
        let persisted = if self.cookies.is_some() { None } else { token.as_deref() };
        self.session.login(persisted, user.clone())?;
        Ok(user)
    }

    /// Validates the input and creates an account. Does not sign in.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<Option<UserInfo>> {
        let request = RegisterRequest::new(username, email, password);
        request.validate()?;
        self.api.register(&request).await
    }

    /// Signs out.
    ///
    /// The backend is told first; a failure there is logged and local state
    /// is cleared regardless.
    pub async fn logout(&self) -> ClientResult<()> {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Backend logout failed, clearing local session anyway");
        }
        if let Some(jar) = &self.cookies {
            jar.remove(crate::storage::TOKEN_COOKIE);
        }
        self.session.logout()
    }

    /// Exchanges the credential for a fresh one and stores it.
    pub async fn refresh(&self) -> ClientResult<String> {
        let token = self.api.refresh().await?;
        match &self.cookies {
            Some(jar) => jar.set(crate::storage::TOKEN_COOKIE, &token),
            None => self.store.save_token(&token)?,
        }
        self.roles.clear_cache();
        info!("Credential refreshed");
        Ok(token)
    }

    /// Requests a password reset email.
    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        validate_email(email)?;
        self.api.forgot_password(email).await
    }

    /// Fetches the current profile and updates the session with it.
    pub async fn refresh_user(&self) -> ClientResult<UserInfo> {
        if !self.session.is_logged_in() {
            return Err(ClientError::unauthorized("not signed in"));
        }
        let user = self.api.user_info().await?;
        self.session.update_user(user.clone())?;
        debug!("Profile refreshed");
        Ok(user)
    }

    /// Decides a navigation.
    pub async fn navigate(&self, full_path: &str) -> NavigationDecision {
        self.guard.before_each(full_path).await
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the session.
    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// Returns the role resolver.
    pub fn roles(&self) -> &Arc<RoleResolver> {
        &self.roles
    }

    /// Returns the route guard.
    pub fn guard(&self) -> &Arc<RouteGuard> {
        &self.guard
    }

    /// Returns the token inspector.
    pub fn inspector(&self) -> &TokenInspector {
        &self.inspector
    }

    /// Returns the token store.
    pub fn token_store(&self) -> &TokenStore {
        &self.store
    }

    /// Returns the cookie jar, when the credential is cookie-sourced.
    pub fn cookie_jar(&self) -> Option<&Arc<CookieJar>> {
        self.cookies.as_ref()
    }
}

impl std::fmt::Debug for QuillClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuillClient")
            .field("session", &self.session)
            .field("roles", &self.roles)
            .field("cookies", &self.cookies.is_some())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// QuillClientBuilder
// =============================================================================

/// Builder for [`QuillClient`].
pub struct QuillClientBuilder {
    api: Option<Arc<dyn AuthApi>>,
    store: Option<TokenStore>,
    cookies: Option<Arc<CookieJar>>,
    role_cache_ttl: Duration,
    session: SessionOptions,
    routes: RoutesConfig,
    table: Option<RouteTable>,
}

impl QuillClientBuilder {
    /// Creates a builder with default settings and in-memory storage.
    pub fn new() -> Self {
        Self {
            api: None,
            store: None,
            cookies: None,
            role_cache_ttl: DEFAULT_ROLE_CACHE_TTL,
            session: SessionOptions::default(),
            routes: RoutesConfig::default(),
            table: None,
        }
    }

    /// Sets the backend API. Required.
    pub fn api(mut self, api: Arc<dyn AuthApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Sets the token store.
    pub fn token_store(mut self, store: TokenStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the storage backend.
    pub fn storage(self, store: Arc<dyn KeyValueStore>) -> Self {
        self.token_store(TokenStore::new(store))
    }

    /// Reads the credential from a cookie jar instead of the token store.
    pub fn cookie_jar(mut self, jar: Arc<CookieJar>) -> Self {
        self.cookies = Some(jar);
        self
    }

    /// Sets the role cache window.
    pub fn role_cache_ttl(mut self, ttl: Duration) -> Self {
        self.role_cache_ttl = ttl;
        self
    }

    /// Enables or disables the startup probe.
    pub fn validate_on_init(mut self, enabled: bool) -> Self {
        self.session.validate_on_init = enabled;
        self
    }

    /// Sets the fallback avatar.
    pub fn default_avatar(mut self, url: impl Into<String>) -> Self {
        self.session.default_avatar = url.into();
        self
    }

    /// Sets the navigation targets and site title.
    pub fn routes(mut self, routes: RoutesConfig) -> Self {
        self.routes = routes;
        self
    }

    /// Replaces the blog route table.
    pub fn route_table(mut self, table: RouteTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Builds the client.
    pub fn build(self) -> ClientResult<QuillClient> {
        let api = self
            .api
            .ok_or_else(|| ClientError::validation("api", "an AuthApi is required"))?;
        let store = self
            .store
            .unwrap_or_else(|| TokenStore::new(Arc::new(MemoryStore::new())));

        let credentials: Arc<dyn CredentialSource> = match &self.cookies {
            Some(jar) => jar.clone(),
            None => Arc::new(store.clone()),
        };

        let roles = Arc::new(RoleResolver::new(api.clone(), self.role_cache_ttl));
        let session = Arc::new(AuthSession::new(
            store.clone(),
            credentials.clone(),
            roles.clone(),
            self.session,
        ));
        let guard = Arc::new(RouteGuard::new(
            session.clone(),
            roles.clone(),
            self.table.unwrap_or_default(),
            self.routes,
        ));

        Ok(QuillClient {
            api,
            store,
            cookies: self.cookies,
            inspector: TokenInspector::new(credentials),
            roles,
            session,
            guard,
        })
    }
}

impl Default for QuillClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_config::StorageBackend;

    #[test]
    fn test_build_requires_api() {
        assert!(matches!(
            QuillClient::builder().build(),
            Err(ClientError::Validation { .. })
        ));
    }

    #[test]
    fn test_from_config_cookie_source() {
        let mut config = QuillConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.auth.token_source = TokenSource::Cookie;
        config.storage.cookie = Some("jwt_token=h.p.s".to_string());

        let client = QuillClient::from_config(&config).unwrap();
        assert_eq!(client.inspector().token().as_deref(), Some("h.p.s"));
        assert!(client.cookie_jar().is_some());
        assert!(client.token_store().token().unwrap().is_none());
    }

    #[test]
    fn test_from_config_storage_source() {
        let mut config = QuillConfig::default();
        config.storage.backend = StorageBackend::Memory;

        let client = QuillClient::from_config(&config).unwrap();
        assert!(client.cookie_jar().is_none());
        client.token_store().save_token("a.b.c").unwrap();
        assert_eq!(client.inspector().token().as_deref(), Some("a.b.c"));
    }
}
