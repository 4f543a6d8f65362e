//! Bearer token type.

use std::fmt;

/// A bearer token for authenticated Strapi requests.
///
/// Either a JWT issued by `/auth/local` or a pre-issued API token.
/// The value is never shown in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The middle (payload) segment of a compact JWT, if there is one.
    pub fn payload_segment(&self) -> Option<&str> {
        let mut parts = self.0.split('.');
        let _header = parts.next()?;
        parts.next().filter(|s| !s.is_empty())
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}
