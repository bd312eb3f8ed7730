// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client error types.
//!
//! Errors fall into three families: transport failures (`Network`, `Timeout`,
//! `Http`), backend rejections carried in the response envelope
//! (`Application`), and local failures (token decoding, storage, validation).

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Notice shown for transport-level failures.
pub const NETWORK_NOTICE: &str = "Network connection failed, please check your connection";

/// Notice shown for timeouts.
pub const TIMEOUT_NOTICE: &str = "Request timed out, please try again later";

// =============================================================================
// ClientError
// =============================================================================

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend could not be reached.
    #[error("Network error: {message}")]
    Network {
        /// Transport error description.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or the status reason.
        message: String,
    },

    /// The backend answered with a non-200 envelope code.
    #[error("{message}")]
    Application {
        /// Envelope code.
        code: i64,
        /// Envelope message, shown to the user verbatim.
        message: String,
    },

    /// The credential is not a decodable three-part token.
    #[error("Malformed token: {reason}")]
    MalformedToken {
        /// Why decoding failed.
        reason: String,
    },

    /// The response body did not have the expected shape.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },

    /// Session storage failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Error message.
        message: String,
    },

    /// User input was rejected before any request was made.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Input field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// An operation required a signed-in session.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message.
        message: String,
    },
}

impl ClientError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates an application error from an envelope.
    pub fn application(code: i64, message: impl Into<String>) -> Self {
        Self::Application {
            code,
            message: message.into(),
        }
    }

    /// Creates a malformed token error.
    pub fn malformed_token(reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            reason: reason.into(),
        }
    }

    /// Creates a malformed response error.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns `true` for transport-level failures.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout)
    }

    /// Returns `true` if the backend rejected the request.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application { .. })
    }

    /// Returns the message to show the user.
    ///
    /// Envelope messages are passed through untouched; transport failures
    /// collapse into a generic connectivity notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => NETWORK_NOTICE.to_string(),
            Self::Timeout => TIMEOUT_NOTICE.to_string(),
            Self::Application { message, .. } | Self::Http { message, .. } => message.clone(),
            Self::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::malformed_response(err.to_string())
        } else if let Some(status) = err.status() {
            Self::http(status.as_u16(), err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}
