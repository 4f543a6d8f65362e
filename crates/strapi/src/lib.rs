//! strapi - Query builder and client for the Strapi headless CMS.
//!
//! Builds version-aware REST queries (v3, v4 and v5 dialects), fetches them
//! with optional authentication, caches responses, and normalizes the
//! `data`/`attributes` envelopes into plain records.
//!
//! # Quick start
//!
//! ```no_run
//! use strapi::{AuthMethod, Credentials, Operator, Strapi, StrapiConfig};
//!
//! # async fn example() -> Result<(), strapi::Error> {
//! let config = StrapiConfig::from_url("http://localhost:1337/api")?
//!     .with_auth(AuthMethod::Password(Credentials::new("editor@example.com", "secret")));
//! let strapi = Strapi::new(config)?;
//!
//! let mut query = strapi
//!     .collection("articles")
//!     .recent(5)
//!     .field("category.slug")
//!     .filter("news", Operator::EQUALS);
//!
//! for article in query.query(true).await? {
//!     println!("{}", article["title"]);
//! }
//!
//! let about = strapi.collection("pages").find_one_by_id(3, true).await;
//! # Ok(())
//! # }
//! ```
//!
//! # Crates
//!
//! - `strapi-core`: configuration, errors, query dialects, normalizer, traits.
//! - `strapi-http`: the reqwest [`Transport`](strapi_core::Transport).
//! - `strapi-cache`: in-memory and file-backed caches.

pub mod auth;
pub mod cache_index;
mod client;
pub mod collection;
pub mod uploads;

pub use auth::{TOKEN_CACHE_KEY, TokenClaims, TokenManager};
pub use cache_index::{CacheIndex, instance_scope};
pub use client::Strapi;
pub use collection::{CollectionQuery, FieldScope};
pub use uploads::Uploads;

pub use strapi_cache::{FileCache, MemoryCache};
pub use strapi_core::error::{InvalidInputError, RequestFailure, TokenError, TransportError};
pub use strapi_core::{
    ApiVersion, AuthMethod, BaseUrl, BearerToken, Credentials, Error, KeyValueCache, Operator,
    Populate, PopulateField, Record, Response, Result, SortField, SortOrder, SortSpec,
    StrapiConfig, Transport, UploadFile,
};
pub use strapi_http::{HttpOptions, HttpTransport};
