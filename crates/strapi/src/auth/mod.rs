//! Bearer token management.
//!
//! Password authentication logs in with `POST {base}/auth/local` and keeps
//! the returned JWT in the shared cache under [`TOKEN_CACHE_KEY`]. A cached
//! token past its `exp` claim is evicted and replaced once; a token that is
//! already expired straight after login means the clocks disagree and is
//! reported as [`TokenError::RefreshLoop`].

mod claims;

pub use claims::TokenClaims;

#[cfg(test)]
pub(crate) use claims::fake_token;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use strapi_core::error::TokenError;
use strapi_core::traits::remember;
use strapi_core::{
    AuthMethod, BearerToken, Credentials, Error, KeyValueCache, Result, StrapiConfig, Transport,
};

/// Cache key of the login token.
pub const TOKEN_CACHE_KEY: &str = "strapi-token";

/// Obtains and caches bearer tokens for one Strapi instance.
pub struct TokenManager {
    auth: AuthMethod,
    login_url: String,
    ttl: Duration,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn KeyValueCache>,
    login_lock: Mutex<()>,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("auth", &self.auth.name())
            .field("login_url", &self.login_url)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(
        config: &StrapiConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<dyn KeyValueCache>,
    ) -> Self {
        Self {
            auth: config.auth().clone(),
            login_url: config.url().join("auth/local"),
            ttl: config.token_cache_ttl(),
            transport,
            cache,
            login_lock: Mutex::new(()),
        }
    }

    /// The configured authentication method.
    pub fn auth(&self) -> &AuthMethod {
        &self.auth
    }

    /// Token to attach to a request, or `None` for public access.
    pub async fn bearer(&self) -> Result<Option<BearerToken>> {
        if self.auth.is_public() {
            return Ok(None);
        }
        self.get_token().await.map(Some)
    }

    /// A usable token.
    ///
    /// Static tokens are returned as configured, without an expiry check.
    ///
    /// # Errors
    ///
    /// - [`TokenError::NotRequired`] for public access.
    /// - [`TokenError::RefreshLoop`] when a fresh login yields an expired token.
    /// - [`TokenError::Malformed`] when the token cannot be decoded.
    /// - Login failures (see [`TokenManager::login`]).
    #[instrument(skip(self), fields(auth = self.auth.name()))]
    pub async fn get_token(&self) -> Result<BearerToken> {
        let credentials = match &self.auth {
            AuthMethod::Public => return Err(TokenError::NotRequired.into()),
            AuthMethod::Token(token) => return Ok(token.clone()),
            AuthMethod::Password(credentials) => credentials,
        };

        let _guard = self.login_lock.lock().await;
        let mut prevent_loop = false;
        loop {
            let cached = remember(&*self.cache, TOKEN_CACHE_KEY, self.ttl, || async {
                self.login(credentials)
                    .await
                    .map(|token| Value::String(token.as_str().to_string()))
            })
            .await?;

            let token = match cached {
                Value::String(token) => BearerToken::new(token),
                _ => {
                    self.cache.forget(TOKEN_CACHE_KEY).await?;
                    return Err(TokenError::Malformed {
                        reason: "cached token is not a string".to_string(),
                    }
                    .into());
                }
            };

            let claims = match TokenClaims::decode(&token) {
                Ok(claims) => claims,
                Err(err) => {
                    self.cache.forget(TOKEN_CACHE_KEY).await?;
                    return Err(err);
                }
            };

            if !claims.is_expired_at(Utc::now()) {
                return Ok(token);
            }

            self.cache.forget(TOKEN_CACHE_KEY).await?;
            if prevent_loop {
                return Err(TokenError::RefreshLoop.into());
            }
            warn!(expires_at = ?claims.expires_at(), "cached token expired, logging in again");
            prevent_loop = true;
        }
    }

    /// Log in with `credentials` and return the issued JWT.
    ///
    /// # Errors
    ///
    /// - [`Error::PermissionDenied`] for HTTP 401/403 (wrong credentials).
    /// - [`Error::BadRequest`] for HTTP 400.
    /// - [`Error::Unknown`] for any other status, or a body without `jwt`.
    /// - [`Error::Connection`] when the server could not be reached.
    #[instrument(skip(self, credentials), fields(identifier = credentials.identifier()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<BearerToken> {
        info!(url = %self.login_url, "logging in");

        let body = json!({
            "identifier": credentials.identifier(),
            "password": credentials.password(),
        });
        let response = self.transport.post(&self.login_url, &body, None).await?;

        match response.status {
            200..=299 => {}
            400 | 401 | 403 => {
                return Err(Error::from_status(&self.login_url, response.status, response.body));
            }
            status => {
                return Err(Error::Unknown {
                    message: format!("login failed on {}", self.login_url),
                    status: Some(status),
                });
            }
        }

        let jwt = response
            .json()?
            .get("jwt")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(TokenError::MissingJwt)?;

        debug!("login succeeded");
        Ok(BearerToken::new(jwt))
    }

    /// Evict the cached login token.
    pub async fn forget(&self) -> Result<()> {
        self.cache.forget(TOKEN_CACHE_KEY).await
    }
}
