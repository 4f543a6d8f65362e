//! Response normalization.
//!
//! Strapi wraps content in `data` / `attributes` envelopes and returns media
//! as nested file objects. The [`Normalizer`] turns a parsed response body
//! into plain [`Record`]s:
//!
//! 1. [`flatten`] removes the envelopes,
//! 2. [`absolutize`] prefixes relative asset URLs,
//! 3. [`squash_images`] replaces media objects with their URL.
//!
//! Each step is gated by its own flag.

mod absolute;
mod flatten;
mod squash;

pub use absolute::absolutize;
pub use flatten::{MAX_DEPTH, flatten};
pub use squash::squash_images;

use serde_json::{Map, Value};

use crate::Result;

/// One normalized content entry.
pub type Record = Map<String, Value>;

/// Configured normalization pipeline.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use strapi_core::Normalizer;
///
/// let normalizer = Normalizer::new().squash(true);
/// let records = normalizer
///     .records(json!({"data": [{"id": 1, "attributes": {
///         "cover": {"data": {"id": 9, "attributes": {"url": "/a.jpg", "mime": "image/jpeg"}}}
///     }}]}))
///     .unwrap();
/// assert_eq!(records[0]["cover"], "/a.jpg");
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer {
    flatten: bool,
    asset_base: Option<String>,
    squash: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Flattening on, URL rewriting and squashing off.
    pub fn new() -> Self {
        Self {
            flatten: true,
            asset_base: None,
            squash: false,
        }
    }

    /// Toggle envelope removal.
    pub fn flatten(mut self, enabled: bool) -> Self {
        self.flatten = enabled;
        self
    }

    /// Prefix relative asset URLs with `base` (`None` disables).
    pub fn absolute(mut self, base: Option<String>) -> Self {
        self.asset_base = base;
        self
    }

    /// Toggle media squashing.
    pub fn squash(mut self, enabled: bool) -> Self {
        self.squash = enabled;
        self
    }

    /// Run the enabled steps over `value`.
    pub fn normalize(&self, value: Value) -> Result<Value> {
        let mut value = if self.flatten { flatten(value)? } else { value };
        if let Some(base) = &self.asset_base {
            absolutize(&mut value, base);
        }
        if self.squash {
            match &mut value {
                Value::Array(records) => records.iter_mut().for_each(squash_images),
                record => squash_images(record),
            }
        }
        Ok(value)
    }

    /// Normalize and convert the result into records.
    pub fn records(&self, value: Value) -> Result<Vec<Record>> {
        Ok(into_records(self.normalize(value)?))
    }
}

/// Convert a normalized value into a record list.
///
/// An array yields its mapping members (other members are dropped), a
/// non-empty mapping yields itself, anything else yields nothing. A mapping
/// that is only `{"data": null}` counts as empty.
pub fn into_records(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        Value::Object(map) if is_empty_envelope(&map) => Vec::new(),
        Value::Object(map) => vec![map],
        _ => Vec::new(),
    }
}

fn is_empty_envelope(map: &Record) -> bool {
    map.is_empty() || (map.len() == 1 && map.get("data").is_some_and(Value::is_null))
}

/// Detach the top-level `meta` mapping from a response body.
pub fn split_meta(body: &mut Value) -> Option<Record> {
    match body.as_object_mut()?.remove("meta")? {
        Value::Object(meta) => Some(meta),
        _ => None,
    }
}
