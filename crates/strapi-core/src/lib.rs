//! strapi-core - Core types and traits for the Strapi client.
//!
//! This crate holds everything that does not touch the network: the error
//! taxonomy, configuration, the query-string builder, filters, and the
//! response normalizer. I/O goes through the [`Transport`] and
//! [`KeyValueCache`] traits, implemented in sibling crates.

pub mod config;
pub mod credentials;
pub mod error;
pub mod normalize;
pub mod query;
pub mod tokens;
pub mod traits;
pub mod types;

pub use config::{AuthMethod, StrapiConfig};
pub use credentials::Credentials;
pub use error::Error;
pub use normalize::{Normalizer, Record};
pub use query::{FieldFilter, FilterSet, Operator, QueryDialect};
pub use tokens::BearerToken;
pub use traits::{KeyValueCache, Response, Transport, UploadFile};
pub use types::{ApiVersion, BaseUrl, Populate, PopulateField, SortField, SortOrder, SortSpec};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
