//! Shared client context.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, trace};

use strapi_cache::MemoryCache;
use strapi_core::query::UrlBuilder;
use strapi_core::{BearerToken, Error, KeyValueCache, Response, Result, StrapiConfig, Transport};
use strapi_http::HttpTransport;

use crate::auth::TokenManager;
use crate::cache_index::CacheIndex;
use crate::collection::CollectionQuery;
use crate::uploads::Uploads;

/// Handle on one Strapi instance.
///
/// Holds the configuration, the transport, the response cache and the token
/// manager. Cheap to clone (internal `Arc`); queries created from one handle
/// share its cache and login token.
///
/// # Example
///
/// ```no_run
/// use strapi::{Strapi, StrapiConfig};
///
/// # async fn example() -> Result<(), strapi::Error> {
/// let strapi = Strapi::new(StrapiConfig::from_url("http://localhost:1337/api")?)?;
/// let articles = strapi
///     .collection("articles")
///     .sort("publishedAt")
///     .limit(10)
///     .query(true)
///     .await?;
/// println!("{} articles", articles.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Strapi {
    inner: Arc<StrapiInner>,
}

struct StrapiInner {
    config: StrapiConfig,
    urls: UrlBuilder,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn KeyValueCache>,
    tokens: TokenManager,
    index: CacheIndex,
}

impl fmt::Debug for Strapi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strapi")
            .field("url", &self.inner.config.url().as_str())
            .field("version", &self.inner.config.version())
            .field("auth", &self.inner.config.auth().name())
            .finish_non_exhaustive()
    }
}

impl Strapi {
    /// Client with the reqwest transport and an in-memory cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is inconsistent or the HTTP
    /// client cannot be built.
    pub fn new(config: StrapiConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(&config)?;
        Self::with_backends(config, Arc::new(transport), Arc::new(MemoryCache::new()))
    }

    /// Client over caller-provided transport and cache.
    pub fn with_backends(
        config: StrapiConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<dyn KeyValueCache>,
    ) -> Result<Self> {
        config.validate()?;

        let urls = UrlBuilder::new(config.url().clone(), config.version());
        let tokens = TokenManager::new(&config, transport.clone(), cache.clone());
        let index = CacheIndex::new(
            cache.clone(),
            config.cache_ttl(),
            config.cache_index_max_size(),
        );

        Ok(Self {
            inner: Arc::new(StrapiInner {
                config,
                urls,
                transport,
                cache,
                tokens,
                index,
            }),
        })
    }

    /// Start a query against `collection_type` (e.g. `articles`).
    pub fn collection(&self, collection_type: impl Into<String>) -> CollectionQuery {
        CollectionQuery::new(self.clone(), collection_type.into())
    }

    /// Media library operations.
    pub fn uploads(&self) -> Uploads {
        Uploads::new(self.clone())
    }

    pub fn config(&self) -> &StrapiConfig {
        &self.inner.config
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.inner.urls
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.inner.tokens
    }

    pub fn cache_index(&self) -> &CacheIndex {
        &self.inner.index
    }

    pub fn cache(&self) -> &dyn KeyValueCache {
        self.inner.cache.as_ref()
    }

    pub fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    /// Token for the next request, `None` for public access.
    pub async fn bearer(&self) -> Result<Option<BearerToken>> {
        self.inner.tokens.bearer().await
    }

    /// Authenticated `GET url`, parsed as JSON.
    ///
    /// # Errors
    ///
    /// Non-success statuses map to their error kind; an empty body or a
    /// JSON `null` is [`Error::Unknown`].
    #[instrument(skip(self))]
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        let token = self.bearer().await?;
        debug!(auth = self.inner.config.auth().name(), "GET request");

        let response = self
            .inner
            .transport
            .get(url, token.as_ref())
            .await?
            .error_for_status(url)?;
        trace!(status = response.status, size = response.body.len(), "GET succeeded");

        if response.body.trim().is_empty() {
            return Err(no_data(url));
        }
        match response.json()? {
            Value::Null => Err(no_data(url)),
            value => Ok(value),
        }
    }
}

fn no_data(url: &str) -> Error {
    Error::unknown(format!("Strapi returned no data for {url}"))
}

/// Outcome of a write call: the parsed body (`null` when empty), or the
/// error for its status.
pub(crate) fn write_outcome(url: &str, response: Response) -> Result<Value> {
    match response.status {
        200..=299 if response.body.trim().is_empty() => Ok(Value::Null),
        200..=299 => response.json(),
        400 | 401 | 403 => Err(Error::from_status(url, response.status, response.body)),
        status => Err(Error::Unknown {
            message: format!("write to {url} failed: {}", response.body),
            status: Some(status),
        }),
    }
}
