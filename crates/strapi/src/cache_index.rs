//! Per-collection index of cache keys.
//!
//! Cached responses are keyed by request URL, so clearing "everything for
//! `articles`" needs a list of those URLs. The index is itself a cache
//! entry (a JSON array of strings) and shares the response TTL.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use strapi_core::{AuthMethod, KeyValueCache, Result, StrapiConfig};

/// Index name for the query URLs of a collection.
pub fn collection_index(collection_type: &str) -> String {
    collection_type.to_string()
}

/// Index name for the item ids cached by `find_one`.
pub fn items_index(collection_type: &str) -> String {
    format!("{collection_type}_items")
}

/// Cache key pointing from an item id to its cached response.
pub fn item_pointer(collection_type: &str, id: &str) -> String {
    format!("{collection_type}_item:{id}")
}

/// Name for the cache partition of one instance and identity.
///
/// Hashes the API root with the auth method and its identifier or token.
/// Caches that outlive the process (the file cache) should be opened
/// per scope, since the login token is kept under a fixed key.
pub fn instance_scope(config: &StrapiConfig) -> String {
    let identity = match config.auth() {
        AuthMethod::Public => "",
        AuthMethod::Password(credentials) => credentials.identifier(),
        AuthMethod::Token(token) => token.as_str(),
    };
    let material = format!(
        "{}\n{}\n{identity}",
        config.url().as_str(),
        config.auth().name()
    );
    sha256_hex(material.as_bytes())
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Bounded, deduplicated lists of cache keys.
#[derive(Clone)]
pub struct CacheIndex {
    cache: Arc<dyn KeyValueCache>,
    ttl: Duration,
    max_size: usize,
}

impl std::fmt::Debug for CacheIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheIndex")
            .field("ttl", &self.ttl)
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

impl CacheIndex {
    pub fn new(cache: Arc<dyn KeyValueCache>, ttl: Duration, max_size: usize) -> Self {
        Self {
            cache,
            ttl,
            max_size: max_size.max(1),
        }
    }

    /// Keys listed under `index`, oldest first. Missing or unreadable
    /// indexes are empty.
    pub async fn keys(&self, index: &str) -> Result<Vec<String>> {
        Ok(match self.cache.get(index).await? {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(key) => Some(key),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Append `key` to `index` unless already listed, dropping the oldest
    /// keys beyond the size bound.
    pub async fn record(&self, index: &str, key: &str) -> Result<()> {
        let mut keys = self.keys(index).await?;
        if keys.iter().any(|existing| existing == key) {
            return Ok(());
        }

        keys.push(key.to_string());
        if keys.len() > self.max_size {
            let excess = keys.len() - self.max_size;
            keys.drain(..excess);
        }

        trace!(index, len = keys.len(), "index updated");
        self.store(index, keys).await
    }

    /// Remove `key` from `index`.
    pub async fn remove(&self, index: &str, key: &str) -> Result<()> {
        let mut keys = self.keys(index).await?;
        let before = keys.len();
        keys.retain(|existing| existing != key);
        if keys.len() != before {
            self.store(index, keys).await?;
        }
        Ok(())
    }

    /// Evict every listed key, then the index itself. Returns the number of
    /// keys evicted.
    pub async fn clear(&self, index: &str) -> Result<usize> {
        let keys = self.keys(index).await?;
        for key in &keys {
            self.cache.forget(key).await?;
        }
        self.cache.forget(index).await?;
        debug!(index, evicted = keys.len(), "index cleared");
        Ok(keys.len())
    }

    async fn store(&self, index: &str, keys: Vec<String>) -> Result<()> {
        let value = Value::Array(keys.into_iter().map(Value::String).collect());
        self.cache.put(index, value, self.ttl).await
    }
}
