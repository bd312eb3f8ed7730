// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Cookie-backed credential source.

use std::sync::Arc;

use parking_lot::RwLock;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::warn;

use super::{CredentialSource, KeyValueStore, COOKIE_JAR_KEY, TOKEN_COOKIE};

/// Bytes escaped in cookie values. Token characters pass through.
const COOKIE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A cookie header, kept as `name=value` pairs.
///
/// Used when the backend hands the credential out as a `jwt_token` cookie
/// instead of in the login response body. A persistent jar writes itself to
/// a [`KeyValueStore`] after every change, so the cookie outlives the process.
#[derive(Default)]
pub struct CookieJar {
    cookies: RwLock<Vec<(String, String)>>,
    store: Option<Arc<dyn KeyValueStore>>,
}

fn parse_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

impl CookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a jar from a `Cookie` header such as `a=1; jwt_token=xyz`.
    pub fn from_header(header: &str) -> Self {
        let jar = Self::new();
        jar.replace_header(header);
        jar
    }

    /// Creates a jar saved under [`COOKIE_JAR_KEY`] in `store`.
    ///
    /// Cookies saved by an earlier run are loaded first; pairs in `seed`
    /// only fill in names the saved jar does not have.
    pub fn persistent(store: Arc<dyn KeyValueStore>, seed: &str) -> Self {
        let saved = match store.get(COOKIE_JAR_KEY) {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Saved cookies unreadable, starting empty");
                String::new()
            }
        };
        let mut cookies = parse_header(&saved);
        for (name, value) in parse_header(seed) {
            if !cookies.iter().any(|(n, _)| *n == name) {
                cookies.push((name, value));
            }
        }
        Self {
            cookies: RwLock::new(cookies),
            store: Some(store),
        }
    }

    /// Replaces the jar contents with the pairs in `header`.
    pub fn replace_header(&self, header: &str) {
        *self.cookies.write() = parse_header(header);
        self.save();
    }

    fn save(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let header = self.header();
        let result = if header.is_empty() {
            store.remove(COOKIE_JAR_KEY)
        } else {
            store.set(COOKIE_JAR_KEY, &header)
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to save cookies");
        }
    }

    /// Returns the percent-decoded value of the first cookie named `name`.
    pub fn get(&self, name: &str) -> Option<String> {
        let cookies = self.cookies.read();
        let (_, raw) = cookies.iter().find(|(n, _)| n == name)?;
        Some(percent_decode_str(raw).decode_utf8_lossy().into_owned())
    }

    /// Sets a cookie, percent-encoding the value.
    pub fn set(&self, name: &str, value: &str) {
        let encoded = utf8_percent_encode(value, COOKIE_VALUE).to_string();
        {
            let mut cookies = self.cookies.write();
            match cookies.iter_mut().find(|(n, _)| n == name) {
                Some(entry) => entry.1 = encoded,
                None => cookies.push((name.to_string(), encoded)),
            }
        }
        self.save();
    }

    /// Removes a cookie.
    pub fn remove(&self, name: &str) {
        self.cookies.write().retain(|(n, _)| n != name);
        self.save();
    }

    /// Records a `Set-Cookie` response header. Attributes after the first
    /// `;` are ignored.
    pub fn store_set_cookie(&self, set_cookie: &str) {
        let first = set_cookie.split(';').next().unwrap_or_default();
        if let Some((name, value)) = first.split_once('=') {
            let name = name.trim();
            if name.is_empty() {
                return;
            }
            let value = value.trim();
            {
                let mut cookies = self.cookies.write();
                if value.is_empty() {
                    cookies.retain(|(n, _)| n != name);
                } else {
                    match cookies.iter_mut().find(|(n, _)| n == name) {
                        Some(entry) => entry.1 = value.to_string(),
                        None => cookies.push((name.to_string(), value.to_string())),
                    }
                }
            }
            self.save();
        }
    }

    /// Renders the jar as a `Cookie` header value.
    pub fn header(&self) -> String {
        self.cookies
            .read()
            .iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl std::fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieJar")
            .field("cookies", &self.cookies.read().len())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl CredentialSource for CookieJar {
    fn credential(&self) -> Option<String> {
        self.get(TOKEN_COOKIE).filter(|v| !v.is_empty())
    }
}
