// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Persisted user snapshot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::claims::{lenient_int, lenient_role};
use super::Role;

/// Snapshot of the signed-in user.
///
/// Any JSON object loads. Fields the client does not know about, and known
/// fields holding a value of an unexpected type, are kept in `extra` and
/// written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Map<String, Value>")]
pub struct UserInfo {
    /// User ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// Role at the time of the snapshot. Display only; permission checks ask
    /// the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Remaining backend fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for UserInfo {
    fn from(mut fields: Map<String, Value>) -> Self {
        fn take<T>(
            fields: &mut Map<String, Value>,
            key: &str,
            read: impl Fn(&Value) -> Option<T>,
        ) -> Option<T> {
            let value = fields.remove(key)?;
            if value.is_null() {
                return None;
            }
            match read(&value) {
                Some(parsed) => Some(parsed),
                None => {
                    fields.insert(key.to_string(), value);
                    None
                }
            }
        }
        let text = |v: &Value| v.as_str().map(str::to_string);

        Self {
            id: take(&mut fields, "id", lenient_int),
            username: take(&mut fields, "username", text),
            email: take(&mut fields, "email", text),
            avatar_url: take(&mut fields, "avatarUrl", text),
            role: take(&mut fields, "role", lenient_role),
            extra: fields,
        }
    }
}

impl UserInfo {
    /// Creates a user snapshot with an ID and username.
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            username: Some(username.into()),
            ..Self::default()
        }
    }

    /// Sets the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Sets the avatar URL.
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
