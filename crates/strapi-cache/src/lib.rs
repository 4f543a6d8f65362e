//! strapi-cache - [`KeyValueCache`](strapi_core::KeyValueCache) backends.
//!
//! - [`MemoryCache`]: process-local, for tests and short-lived tools.
//! - [`FileCache`]: one JSON file per key, shared across processes.

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;
