//! Query-string construction.
//!
//! [`UrlBuilder`] assembles request URLs from a [`QueryParams`] snapshot,
//! delegating every version-specific rendering decision to a
//! [`QueryDialect`]. [`FilterSet`] holds per-field filter predicates.

mod dialect;
mod filter;
mod url;

pub use dialect::{LegacyDialect, QueryDialect, V4Dialect, V5Dialect};
pub use filter::{FieldFilter, FilterSet, Operator};
pub use url::{DEFAULT_PAGE_SIZE, QueryParams, UrlBuilder};
