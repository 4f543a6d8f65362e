//! Login credentials type.

use std::fmt;

use serde::Deserialize;

/// Username/password pair for `POST /auth/local`.
///
/// The password never appears in Debug output.
///
/// # Example
///
/// ```
/// use strapi_core::Credentials;
///
/// let creds = Credentials::new("editor@example.com", "hunter2");
/// assert_eq!(creds.identifier(), "editor@example.com");
/// ```
#[derive(Clone, Deserialize)]
pub struct Credentials {
    identifier: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }

    /// Returns the identifier (username or email).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the password.
    ///
    /// Only for building the login request body.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// True when either half is missing.
    pub fn is_incomplete(&self) -> bool {
        self.identifier.is_empty() || self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
