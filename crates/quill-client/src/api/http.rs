// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `reqwest` implementation of [`AuthApi`].

use std::sync::Arc;

use async_trait::async_trait;
use quill_config::ApiConfig;
use reqwest::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    AuthApi, Envelope, ForgotPasswordRequest, LoginData, LoginRequest, RefreshResponse,
    RegisterRequest, RoleData, FORGOT_PASSWORD_PATH, LOGIN_PATH, LOGOUT_PATH, REFRESH_PATH,
    REGISTER_PATH, ROLE_PATH, SUCCESS_CODE, USER_INFO_PATH,
};
use crate::auth::{Role, UserInfo};
use crate::error::{ClientError, ClientResult};
use crate::storage::{CookieJar, CredentialSource};

/// HTTP client for the backend.
///
/// Sends the current credential as `Authorization: Bearer <token>`. With a
/// cookie jar attached, the jar is also sent as the `Cookie` header and
/// `Set-Cookie` answers are recorded in it.
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
    cookies: Option<Arc<CookieJar>>,
}

impl HttpAuthApi {
    /// Creates a client for `config`, reading the credential from `credentials`.
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialSource>) -> ClientResult<Self> {
        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url(),
            credentials,
            cookies: None,
        })
    }

    /// Attaches a cookie jar.
    pub fn with_cookie_jar(mut self, jar: Arc<CookieJar>) -> Self {
        self.cookies = Some(jar);
        self
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(token) = self.credentials.credential() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(jar) = &self.cookies {
            let header = jar.header();
            if !header.is_empty() {
                request = request.header(COOKIE, header);
            }
        }
        request
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> ClientResult<Response> {
        debug!(path, "Sending request");
        let response = request.send().await?;

        if let Some(jar) = &self.cookies {
            for value in response.headers().get_all(SET_COOKIE) {
                if let Ok(value) = value.to_str() {
                    jar.store_set_cookie(value);
                }
            }
        }

        let status = response.status();
        if !status.is_success() {
            // Prefer the message from an error body, as the envelope would carry it.
            let message = response
                .json::<Envelope<serde_json::Value>>()
                .await
                .ok()
                .and_then(|env| env.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
            warn!(path, status = status.as_u16(), %message, "Request failed");
            return Err(ClientError::http(status.as_u16(), message));
        }

        Ok(response)
    }

    async fn envelope<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&dyn ErasedBody>,
    ) -> ClientResult<Envelope<T>> {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = body.attach(request);
        }

        let response = self.send(request, path).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ClientError::malformed_response(format!("{} returned an unexpected body: {}", path, e))
        })
    }
}

/// Object-safe JSON body.
trait ErasedBody: Send + Sync {
    fn attach(&self, request: RequestBuilder) -> RequestBuilder;
}

impl<T: Serialize + Send + Sync> ErasedBody for T {
    fn attach(&self, request: RequestBuilder) -> RequestBuilder {
        request.json(self)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn fetch_role(&self) -> ClientResult<Role> {
        let data: RoleData = self
            .envelope(Method::GET, ROLE_PATH, None)
            .await?
            .into_data()?;
        data.role
            .ok_or_else(|| ClientError::malformed_response("role response has no role"))
    }

    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginData> {
        let mut data: LoginData = self
            .envelope(Method::POST, LOGIN_PATH, Some(request))
            .await?
            .into_result()?
            .unwrap_or_default();

        // Cookie-issued credential.
        if data.token.is_none() {
            data.token = self.cookies.as_ref().and_then(|jar| jar.credential());
        }

        info!(username = %request.username, "Login accepted");
        Ok(data)
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<Option<UserInfo>> {
        let created = self
            .envelope(Method::POST, REGISTER_PATH, Some(request))
            .await?
            .into_result()?;
        info!(username = %request.username, "Registration accepted");
        Ok(created)
    }

    async fn user_info(&self) -> ClientResult<UserInfo> {
        self.envelope(Method::GET, USER_INFO_PATH, None)
            .await?
            .into_data()
    }

    async fn logout(&self) -> ClientResult<()> {
        self.envelope::<serde_json::Value>(Method::POST, LOGOUT_PATH, None)
            .await?
            .into_result()?;
        Ok(())
    }

    async fn refresh(&self) -> ClientResult<String> {
        let response = self
            .send(self.request(Method::POST, REFRESH_PATH), REFRESH_PATH)
            .await?;
        let text = response.text().await?;
        let body: RefreshResponse = serde_json::from_str(&text).map_err(|e| {
            ClientError::malformed_response(format!("refresh returned an unexpected body: {}", e))
        })?;

        if body.code != SUCCESS_CODE {
            let message = body
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Token refresh failed".to_string());
            return Err(ClientError::application(body.code, message));
        }

        body.credential()
            .ok_or_else(|| ClientError::malformed_response("refresh response has no token"))
    }

    async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.envelope::<serde_json::Value>(Method::POST, FORGOT_PASSWORD_PATH, Some(&body))
            .await?
            .into_result()?;
        Ok(())
    }
}

impl std::fmt::Debug for HttpAuthApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuthApi")
            .field("base_url", &self.base_url)
            .field("cookies", &self.cookies.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, TokenStore};

    #[test]
    fn test_base_url_from_config() {
        let config = ApiConfig {
            base_url: "http://blog.test/".to_string(),
            ..ApiConfig::default()
        };
        let store = TokenStore::new(Arc::new(MemoryStore::new()));
        let api = HttpAuthApi::new(&config, Arc::new(store)).unwrap();
        assert_eq!(api.base_url(), config.api_base_url());
        assert!(format!("{:?}", api).contains("cookies: false"));
    }
}
