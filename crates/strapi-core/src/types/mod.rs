//! Core Strapi types.
//!
//! These types validate at construction time so the query builder never
//! sees an unsupported version or a malformed base URL.

mod api_version;
mod base_url;
mod populate;
mod sort;

pub use api_version::ApiVersion;
pub use base_url::BaseUrl;
pub use populate::{Populate, PopulateField};
pub use sort::{SortField, SortOrder, SortSpec};
