// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Backend response envelope.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Envelope code meaning success.
pub const SUCCESS_CODE: i64 = 200;

// =============================================================================
// Envelope
// =============================================================================

/// Every backend response body: `{code, message, data}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Application status code. `200` is success.
    #[serde(default)]
    pub code: i64,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Payload.
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    /// Creates a success envelope.
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: Some("success".to_string()),
            data: Some(data),
        }
    }

    /// Creates a failure envelope.
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Returns `true` if the code is [`SUCCESS_CODE`].
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Returns the payload, which may be absent, or the application error.
    pub fn into_result(self) -> ClientResult<Option<T>> {
        if self.is_success() {
            Ok(self.data)
        } else {
            let message = self
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Request failed".to_string());
            Err(ClientError::application(self.code, message))
        }
    }

    /// Returns the payload, failing if a successful envelope carries none.
    pub fn into_data(self) -> ClientResult<T> {
        self.into_result()?
            .ok_or_else(|| ClientError::malformed_response("response has no data"))
    }
}
