//! Error types for the Strapi client.
//!
//! One error enum covers every failure the client can surface. HTTP-level
//! rejections (the server answered) are kept apart from transport failures
//! (no exchange completed) so callers can tell "reachable but refused" from
//! "unreachable".

use std::fmt;
use thiserror::Error;

/// The unified error type for Strapi client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP 400 from any call.
    #[error("bad request: {0}")]
    BadRequest(RequestFailure),

    /// HTTP 404 from a read call.
    #[error("not found: {0}")]
    NotFound(RequestFailure),

    /// HTTP 401 or 403.
    #[error("permission denied: {0}")]
    PermissionDenied(RequestFailure),

    /// The request never completed (DNS, TLS, connect, timeout).
    #[error("connection failure: {0}")]
    Connection(#[from] TransportError),

    /// The configured authentication method is not recognized.
    #[error("unknown authentication method '{0}' (expected public, password or token)")]
    UnknownAuthMethod(String),

    /// Bearer token could not be obtained or is unusable.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Any other non-success status, or a body that could not be used.
    #[error("unknown error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Unknown {
        /// Description of what went wrong.
        message: String,
        /// HTTP status, when the failure came from a response.
        status: Option<u16>,
    },

    /// Invalid configuration or argument.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Create an [`Error::Unknown`] without an HTTP status.
    pub fn unknown(message: impl Into<String>) -> Self {
        Error::Unknown {
            message: message.into(),
            status: None,
        }
    }

    /// Map a non-success HTTP status to the matching error kind.
    pub fn from_status(url: &str, status: u16, body: impl Into<String>) -> Self {
        let failure = RequestFailure::new(url, status, body);
        match status {
            400 => Error::BadRequest(failure),
            401 | 403 => Error::PermissionDenied(failure),
            404 => Error::NotFound(failure),
            _ => Error::Unknown {
                message: failure.to_string(),
                status: Some(status),
            },
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::BadRequest(f) | Error::NotFound(f) | Error::PermissionDenied(f) => {
                Some(f.status)
            }
            Error::Unknown { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true for HTTP 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::unknown(format!("invalid JSON: {err}"))
    }
}

/// Context of a request the server rejected.
#[derive(Debug, Clone)]
pub struct RequestFailure {
    /// Request URL.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl RequestFailure {
    /// Create a new request failure context.
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Error name and message from a Strapi error body
    /// (`{"error": {"name": ..., "message": ...}}`), if present.
    pub fn strapi_error(&self) -> Option<(String, String)> {
        let body: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        let error = body.get("error")?;
        let name = error.get("name")?.as_str()?.to_string();
        let message = error.get("message")?.as_str()?.to_string();
        Some((name, message))
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} {}", self.status, self.url)?;
        if let Some((name, message)) = self.strapi_error() {
            write!(f, " [{}]: {}", name, message)?;
        }
        Ok(())
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// TLS/SSL error.
    #[error("TLS error: {message}")]
    Tls { message: String },

    /// Request timed out before a response arrived.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Any other failure to complete the exchange.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Token lifecycle errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// A freshly obtained token was already expired.
    #[error("token refresh loop detected (token expired right after login; check clock skew)")]
    RefreshLoop,

    /// The token could not be decoded.
    #[error("malformed token: {reason}")]
    Malformed { reason: String },

    /// The login response did not carry a token.
    #[error("login response did not contain a jwt")]
    MissingJwt,

    /// A token was requested while the client is configured for public access.
    #[error("public authentication does not use a token")]
    NotRequired,
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base URL.
    #[error("invalid URL '{value}': {reason}")]
    Url { value: String, reason: String },

    /// Unsupported Strapi API version.
    #[error("API version '{value}' is not supported (supported: 3, 4, 5)")]
    ApiVersion { value: String },

    /// Incomplete or inconsistent configuration.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
