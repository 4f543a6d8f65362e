//! Key/value cache trait.

use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

use crate::Result;

/// A shared key/value store with per-entry expiry.
///
/// Expired entries read as absent.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Read an entry.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store an entry for `ttl`.
    async fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;

    /// Remove an entry. Missing keys are not an error.
    async fn forget(&self, key: &str) -> Result<()>;

    /// Read and remove an entry.
    async fn pull(&self, key: &str) -> Result<Option<Value>> {
        let value = self.get(key).await?;
        if value.is_some() {
            self.forget(key).await?;
        }
        Ok(value)
    }
}

/// Return the cached value for `key`, or run `producer`, store its result
/// for `ttl`, and return it. Failed producers store nothing.
pub async fn remember<C, F, Fut>(cache: &C, key: &str, ttl: Duration, producer: F) -> Result<Value>
where
    C: KeyValueCache + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    if let Some(hit) = cache.get(key).await? {
        return Ok(hit);
    }
    let value = producer().await?;
    cache.put(key, value.clone(), ttl).await?;
    Ok(value)
}
