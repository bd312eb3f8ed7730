// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token claims and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// Role
// =============================================================================

/// User role as reported by the backend.
///
/// The wire format is an integer. Values other than `0` and `1` are kept as
/// `Unknown` and never satisfy a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Administrator (`0`).
    Admin,
    /// Regular user (`1`).
    User,
    /// Any other value.
    Unknown(i64),
}

impl Role {
    /// Returns the wire value.
    pub fn code(&self) -> i64 {
        match self {
            Role::Admin => 0,
            Role::User => 1,
            Role::Unknown(code) => *code,
        }
    }

    /// Returns `true` for the administrator role.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Returns `true` for the regular user role.
    pub fn is_user(&self) -> bool {
        matches!(self, Role::User)
    }

    /// Returns a display name.
    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::User => "User",
            Role::Unknown(_) => "Unknown",
        }
    }

    /// Parses the legacy string form (`"admin"`, `"user"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "administrator" => Some(Role::Admin),
            "user" => Some(Role::User),
            other => other.parse::<i64>().ok().map(Role::from),
        }
    }
}

impl From<i64> for Role {
    fn from(code: i64) -> Self {
        match code {
            0 => Role::Admin,
            1 => Role::User,
            other => Role::Unknown(other),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older user records stored the role as a name rather than a code.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(i64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Code(code) => Ok(Role::from(code)),
            Repr::Name(name) => Role::parse(&name)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown role: {}", name))),
        }
    }
}

// =============================================================================
// Claims
// =============================================================================

/// Decoded token payload.
///
/// Every field is optional on the wire; a missing `exp` makes the token count
/// as expired. Fields are read leniently: a claim with an unexpected JSON type
/// is treated as absent rather than failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "serde_json::Value")]
pub struct Claims {
    /// User ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// User role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Expiration time (Unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at time (Unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Reads an integer from whole numbers, truncated floats, or numeric strings.
pub(super) fn lenient_int(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a role from a code or a name.
pub(super) fn lenient_role(value: &serde_json::Value) -> Option<Role> {
    match value {
        serde_json::Value::String(s) => Role::parse(s),
        other => lenient_int(other).map(Role::from),
    }
}

impl From<serde_json::Value> for Claims {
    fn from(value: serde_json::Value) -> Self {
        Self {
            user_id: value.get("userId").and_then(lenient_int),
            role: value.get("role").and_then(lenient_role),
            exp: value.get("exp").and_then(lenient_int),
            iat: value.get("iat").and_then(lenient_int),
        }
    }
}

impl Claims {
    /// Returns `true` if the claims are expired at `now` (Unix seconds).
    ///
    /// Missing `exp` counts as expired. A token is still valid during the
    /// second named by `exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.exp {
            Some(exp) => exp < now,
            None => true,
        }
    }

    /// Returns `true` if the claims are expired now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Returns the issued at time as a DateTime.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|iat| DateTime::from_timestamp(iat, 0))
    }

    /// Returns the seconds left before expiry, negative once expired.
    pub fn seconds_left_at(&self, now: i64) -> Option<i64> {
        self.exp.map(|exp| exp - now)
    }
}
