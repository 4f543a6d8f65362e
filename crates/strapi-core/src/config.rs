//! Client configuration.

use serde::Deserialize;
use std::time::Duration;

use crate::error::{Error, InvalidInputError};
use crate::{ApiVersion, BaseUrl, BearerToken, Credentials, Result};

/// How requests are authenticated.
#[derive(Clone, Debug, Default)]
pub enum AuthMethod {
    /// No `Authorization` header.
    #[default]
    Public,
    /// Log in with `POST /auth/local` and cache the returned JWT.
    Password(Credentials),
    /// A static API token.
    Token(BearerToken),
}

impl AuthMethod {
    /// Build an auth method from its configured name and secrets.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownAuthMethod`] for a name other than `public`,
    /// `password` or `token`; [`InvalidInputError::Config`] when the
    /// secret the method needs is missing.
    pub fn parse(
        kind: &str,
        identifier: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(AuthMethod::Public),
            "password" => {
                let credentials = Credentials::new(
                    identifier.unwrap_or_default(),
                    password.unwrap_or_default(),
                );
                if credentials.is_incomplete() {
                    return Err(config_error(
                        "password authentication needs an identifier and a password",
                    ));
                }
                Ok(AuthMethod::Password(credentials))
            }
            "token" => match token {
                Some(token) if !token.trim().is_empty() => {
                    Ok(AuthMethod::Token(BearerToken::new(token.trim())))
                }
                _ => Err(config_error("token authentication needs a token")),
            },
            _ => Err(Error::UnknownAuthMethod(kind.to_string())),
        }
    }

    /// Name of the method, as accepted by [`AuthMethod::parse`].
    pub fn name(&self) -> &'static str {
        match self {
            AuthMethod::Public => "public",
            AuthMethod::Password(_) => "password",
            AuthMethod::Token(_) => "token",
        }
    }

    /// True when no token is ever attached.
    pub fn is_public(&self) -> bool {
        matches!(self, AuthMethod::Public)
    }
}

impl<'de> Deserialize<'de> for AuthMethod {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            method: String,
            identifier: Option<String>,
            password: Option<String>,
            token: Option<String>,
        }

        let raw = Raw::deserialize(deserializer)?;
        AuthMethod::parse(
            &raw.method,
            raw.identifier.as_deref(),
            raw.password.as_deref(),
            raw.token.as_deref(),
        )
        .map_err(serde::de::Error::custom)
    }
}

fn config_error(message: &str) -> Error {
    InvalidInputError::Config {
        message: message.to_string(),
    }
    .into()
}

/// Settings for one Strapi instance.
///
/// Deserializable from any serde format; every field except `url` has a
/// default. Durations are whole seconds.
///
/// # Example
///
/// ```
/// use strapi_core::{ApiVersion, StrapiConfig};
///
/// let config: StrapiConfig = serde_json::from_str(
///     r#"{"url": "https://cms.example.com/api", "version": 5}"#,
/// ).unwrap();
/// assert_eq!(config.version(), ApiVersion::V5);
/// assert_eq!(config.upload_url().as_str(), "https://cms.example.com");
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct StrapiConfig {
    url: BaseUrl,
    #[serde(default)]
    upload_url: Option<BaseUrl>,
    #[serde(default)]
    version: ApiVersion,
    #[serde(default)]
    auth: AuthMethod,
    #[serde(default = "default_cache_ttl")]
    cache_ttl: u64,
    #[serde(default = "default_token_cache_ttl")]
    token_cache_ttl: u64,
    #[serde(default = "default_cache_index_max_size")]
    cache_index_max_size: usize,
    #[serde(default)]
    populate_deep: u32,
    #[serde(default)]
    squash_image: bool,
    #[serde(default)]
    absolute_url: bool,
    #[serde(default = "default_timeout")]
    timeout: u64,
    #[serde(default = "default_verify_ssl")]
    verify_ssl: bool,
    #[serde(default)]
    compatibility_mode: bool,
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_token_cache_ttl() -> u64 {
    600
}

fn default_cache_index_max_size() -> usize {
    1000
}

fn default_timeout() -> u64 {
    60
}

fn default_verify_ssl() -> bool {
    true
}

impl StrapiConfig {
    /// Defaults for `url`: v4, public access.
    pub fn new(url: BaseUrl) -> Self {
        Self {
            url,
            upload_url: None,
            version: ApiVersion::default(),
            auth: AuthMethod::Public,
            cache_ttl: default_cache_ttl(),
            token_cache_ttl: default_token_cache_ttl(),
            cache_index_max_size: default_cache_index_max_size(),
            populate_deep: 0,
            squash_image: false,
            absolute_url: false,
            timeout: default_timeout(),
            verify_ssl: default_verify_ssl(),
            compatibility_mode: false,
        }
    }

    /// Parse `url` and use defaults for everything else.
    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::new(BaseUrl::new(url)?))
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<()> {
        if let AuthMethod::Password(credentials) = &self.auth {
            if credentials.is_incomplete() {
                return Err(config_error(
                    "password authentication needs an identifier and a password",
                ));
            }
        }
        if self.cache_index_max_size == 0 {
            return Err(config_error("cache_index_max_size must be at least 1"));
        }
        Ok(())
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_auth(mut self, auth: AuthMethod) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_upload_url(mut self, upload_url: BaseUrl) -> Self {
        self.upload_url = Some(upload_url);
        self
    }

    pub fn with_cache_ttl(mut self, seconds: u64) -> Self {
        self.cache_ttl = seconds;
        self
    }

    pub fn with_token_cache_ttl(mut self, seconds: u64) -> Self {
        self.token_cache_ttl = seconds;
        self
    }

    pub fn with_cache_index_max_size(mut self, size: usize) -> Self {
        self.cache_index_max_size = size;
        self
    }

    pub fn with_populate_deep(mut self, depth: u32) -> Self {
        self.populate_deep = depth;
        self
    }

    pub fn with_squash_image(mut self, enabled: bool) -> Self {
        self.squash_image = enabled;
        self
    }

    pub fn with_absolute_url(mut self, enabled: bool) -> Self {
        self.absolute_url = enabled;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_verify_ssl(mut self, enabled: bool) -> Self {
        self.verify_ssl = enabled;
        self
    }

    pub fn with_compatibility_mode(mut self, enabled: bool) -> Self {
        self.compatibility_mode = enabled;
        self
    }

    /// API base URL.
    pub fn url(&self) -> &BaseUrl {
        &self.url
    }

    /// Base for uploaded media: explicit, or the API base without its
    /// `/api` suffix on v4/v5.
    pub fn upload_url(&self) -> BaseUrl {
        match &self.upload_url {
            Some(url) => url.clone(),
            None if self.version.is_modern() => self.url.without_api_suffix(),
            None => self.url.clone(),
        }
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn auth(&self) -> &AuthMethod {
        &self.auth
    }

    /// Lifetime of cached responses.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Lifetime of the cached login token.
    pub fn token_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.token_cache_ttl)
    }

    /// Most keys kept per collection in the cache index.
    pub fn cache_index_max_size(&self) -> usize {
        self.cache_index_max_size
    }

    /// Default deep-populate depth (0 = off).
    pub fn populate_deep(&self) -> u32 {
        self.populate_deep
    }

    pub fn squash_image(&self) -> bool {
        self.squash_image
    }

    pub fn absolute_url(&self) -> bool {
        self.absolute_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    /// Ask a v5 server for v4-shaped responses.
    pub fn compatibility_mode(&self) -> bool {
        self.compatibility_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StrapiConfig::from_url("https://cms.example.com/api/").unwrap();
        assert_eq!(config.url().as_str(), "https://cms.example.com/api");
        assert_eq!(config.version(), ApiVersion::V4);
        assert!(config.auth().is_public());
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.token_cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.cache_index_max_size(), 1000);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.verify_ssl());
        assert!(!config.compatibility_mode());
    }

    #[test]
    fn upload_url_follows_version() {
        let config = StrapiConfig::from_url("https://cms.example.com/api").unwrap();
        assert_eq!(config.upload_url().as_str(), "https://cms.example.com");

        let legacy = config.clone().with_version(ApiVersion::V3);
        assert_eq!(legacy.upload_url().as_str(), "https://cms.example.com/api");

        let explicit = config.with_upload_url(BaseUrl::new("https://media.example.com").unwrap());
        assert_eq!(explicit.upload_url().as_str(), "https://media.example.com");
    }

    #[test]
    fn parse_auth_methods() {
        assert!(AuthMethod::parse("public", None, None, None).unwrap().is_public());
        assert_eq!(
            AuthMethod::parse("Password", Some("a"), Some("b"), None).unwrap().name(),
            "password"
        );
        assert_eq!(
            AuthMethod::parse("token", None, None, Some("abc")).unwrap().name(),
            "token"
        );
    }

    #[test]
    fn unknown_auth_method() {
        let err = AuthMethod::parse("oauth", None, None, None).unwrap_err();
        assert!(matches!(err, Error::UnknownAuthMethod(ref kind) if kind == "oauth"));
    }

    #[test]
    fn missing_secrets_are_rejected() {
        assert!(matches!(
            AuthMethod::parse("password", Some("a"), None, None),
            Err(Error::InvalidInput(InvalidInputError::Config { .. }))
        ));
        assert!(AuthMethod::parse("token", None, None, Some("  ")).is_err());
    }

    #[test]
    fn deserializes_full_config() {
        let config: StrapiConfig = serde_json::from_str(
            r#"{
                "url": "http://localhost:1337/api",
                "version": "3",
                "auth": {"method": "password", "identifier": "ed", "password": "pw"},
                "cache_ttl": 10,
                "populate_deep": 2,
                "squash_image": true,
                "verify_ssl": false
            }"#,
        )
        .unwrap();

        assert_eq!(config.version(), ApiVersion::V3);
        assert_eq!(config.auth().name(), "password");
        assert_eq!(config.cache_ttl(), Duration::from_secs(10));
        assert_eq!(config.populate_deep(), 2);
        assert!(config.squash_image());
        assert!(!config.verify_ssl());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_auth_in_config_fails_to_deserialize() {
        let result = serde_json::from_str::<StrapiConfig>(
            r#"{"url": "http://localhost:1337", "auth": {"method": "ldap"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_incomplete_credentials() {
        let config = StrapiConfig::from_url("http://localhost:1337")
            .unwrap()
            .with_auth(AuthMethod::Password(Credentials::new("ed", "")));
        assert!(config.validate().is_err());
    }
}
