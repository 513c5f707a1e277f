// ABOUTME: Error taxonomy for calls against the Pierre coaching backend
// ABOUTME: Classifies transport, status, and degraded-content failures for retry and logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

/// Result alias for remote operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Coarse classification of an [`ApiError`], used for retry decisions and log fields
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// No HTTP status: connection refused, reset, DNS failure
    Network,
    /// 408, 504, or a transport-level timeout
    Timeout,
    /// 429 Too Many Requests
    RateLimited,
    /// Any other 5xx
    Server,
    /// Any other 4xx
    Client,
    /// HTTP 200 carrying a canned "unavailable" body
    Degraded,
    /// No session token was available
    Unauthenticated,
    /// Response body did not match the expected shape
    Decode,
    /// Request could not be built
    Request,
}

impl ErrorClass {
    /// Stable lowercase name for structured logging
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::RateLimited => "rate_limited",
            Self::Server => "server",
            Self::Client => "client",
            Self::Degraded => "degraded",
            Self::Unauthenticated => "unauthenticated",
            Self::Decode => "decode",
            Self::Request => "request",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a call against the coaching backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Network-level failure with no HTTP status
    #[error("transport error: {message}")]
    Transport {
        /// Underlying transport message
        message: String,
    },

    /// Request timed out, either at the transport or via 408/504
    #[error("request timed out{}: {message}", status_suffix(.status))]
    Timeout {
        /// Status code when the timeout was reported by the server
        status: Option<u16>,
        /// Detail message
        message: String,
    },

    /// Backend rejected the request with 429
    #[error("rate limited: {message}")]
    RateLimited {
        /// Response body or reason
        message: String,
    },

    /// Backend failed with a 5xx status
    #[error("server error (HTTP {status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Backend rejected the request with a non-retryable 4xx status
    #[error("client error (HTTP {status}): {message}")]
    Client {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Transport succeeded but the body is a known "service unavailable" placeholder
    #[error("degraded response from backend: {body}")]
    DegradedContent {
        /// The canned body that was received
        body: String,
    },

    /// No bearer token is available for the current session
    #[error("no active session token")]
    Unauthenticated,

    /// Response body could not be decoded
    #[error("failed to decode {context}: {message}")]
    Decode {
        /// What was being decoded
        context: &'static str,
        /// Decoder message
        message: String,
    },

    /// Request could not be constructed (bad URL, bad payload)
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Detail message
        message: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl ApiError {
    /// Build a transport error
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a decode error from any displayable cause
    #[must_use]
    pub fn decode(context: &'static str, cause: impl fmt::Display) -> Self {
        Self::Decode {
            context,
            message: cause.to_string(),
        }
    }

    /// Build an invalid-request error
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status and its body onto the taxonomy
    #[must_use]
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let message = body.into();
        match status {
            408 | 504 => Self::Timeout {
                status: Some(status),
                message,
            },
            429 => Self::RateLimited { message },
            500..=599 => Self::Server { status, message },
            _ => Self::Client { status, message },
        }
    }

    /// HTTP status carried by this error, if any
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Timeout { status, .. } => *status,
            Self::RateLimited { .. } => Some(429),
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            Self::DegradedContent { .. } => Some(200),
            Self::Transport { .. }
            | Self::Unauthenticated
            | Self::Decode { .. }
            | Self::InvalidRequest { .. } => None,
        }
    }

    /// Classification used for logging and retry decisions
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Transport { .. } => ErrorClass::Network,
            Self::Timeout { .. } => ErrorClass::Timeout,
            Self::RateLimited { .. } => ErrorClass::RateLimited,
            Self::Server { .. } => ErrorClass::Server,
            Self::Client { .. } => ErrorClass::Client,
            Self::DegradedContent { .. } => ErrorClass::Degraded,
            Self::Unauthenticated => ErrorClass::Unauthenticated,
            Self::Decode { .. } => ErrorClass::Decode,
            Self::InvalidRequest { .. } => ErrorClass::Request,
        }
    }

    /// Whether a retry may succeed
    ///
    /// Network failures, timeouts, 429, 5xx and degraded bodies are transient.
    /// Everything the client caused itself is not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::Network
                | ErrorClass::Timeout
                | ErrorClass::RateLimited
                | ErrorClass::Server
                | ErrorClass::Degraded
        )
    }
}
