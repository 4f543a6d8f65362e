//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use strapi::ApiVersion;

use crate::commands::{cache, find, query, token, write};

/// Strapi CLI tool for content exploration.
#[derive(Parser, Debug)]
#[command(name = "strapi")]
#[command(author, version = env!("STRAPI_CLI_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List entries of a collection
    Query(query::QueryArgs),

    /// Fetch the first entry matching a query
    FindOne(query::QueryArgs),

    /// Fetch one entry by id
    FindById(find::FindByIdArgs),

    /// Run a query against a custom sub-path of a collection
    Custom(find::CustomArgs),

    /// Create an entry, optionally with attached files
    Create(write::CreateArgs),

    /// Update an entry
    Update(write::UpdateArgs),

    /// Delete an entry
    Delete(write::DeleteArgs),

    /// Delete an uploaded file from the media library
    DeleteUpload(write::DeleteUploadArgs),

    /// Evict cached responses of a collection
    ClearCache(cache::ClearCacheArgs),

    /// Show the bearer token used for requests
    Token(token::TokenArgs),
}

/// How to reach and authenticate against the Strapi instance.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// API root, e.g. http://localhost:1337/api
    #[arg(long, env = "STRAPI_URL", global = true)]
    pub url: Option<String>,

    /// Strapi major version (3, 4 or 5)
    #[arg(long = "api-version", env = "STRAPI_VERSION", default_value = "4", global = true)]
    pub api_version: ApiVersion,

    /// Authentication method: public, password or token
    #[arg(long, env = "STRAPI_AUTH", default_value = "public", global = true)]
    pub auth: String,

    /// Login identifier for password authentication
    #[arg(long, env = "STRAPI_IDENTIFIER", global = true)]
    pub identifier: Option<String>,

    /// Password for password authentication
    #[arg(long, env = "STRAPI_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// API token for token authentication
    #[arg(long, env = "STRAPI_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Base URL for uploaded assets (defaults to the API root without /api)
    #[arg(long, env = "STRAPI_UPLOAD_URL", global = true)]
    pub upload_url: Option<String>,

    /// Response cache lifetime in seconds
    #[arg(long, env = "STRAPI_CACHE_TTL", default_value_t = 3600, global = true)]
    pub cache_ttl: u64,

    /// Login token cache lifetime in seconds
    #[arg(long, env = "STRAPI_TOKEN_CACHE_TTL", default_value_t = 600, global = true)]
    pub token_cache_ttl: u64,

    /// Maximum number of cached queries remembered per collection
    #[arg(long, env = "STRAPI_CACHE_INDEX_MAX_SIZE", default_value_t = 1000, global = true)]
    pub cache_index_max_size: usize,

    /// Deep-populate depth for the populate-deep plugin (0 = off)
    #[arg(long, env = "STRAPI_POPULATE_DEEP", default_value_t = 0, global = true)]
    pub populate_deep: u32,

    /// Replace media objects with their URL
    #[arg(long, env = "STRAPI_SQUASH_IMAGE", global = true)]
    pub squash_image: bool,

    /// Prefix relative asset URLs with the upload URL
    #[arg(long, env = "STRAPI_ABSOLUTE_URL", global = true)]
    pub absolute_url: bool,

    /// Request timeout in seconds
    #[arg(long, env = "STRAPI_TIMEOUT", default_value_t = 60, global = true)]
    pub timeout: u64,

    /// Skip TLS certificate verification
    #[arg(long, env = "STRAPI_INSECURE", global = true)]
    pub insecure: bool,

    /// Ask Strapi 5 for v4-shaped responses
    #[arg(long, env = "STRAPI_COMPATIBILITY_MODE", global = true)]
    pub compatibility_mode: bool,

    /// Directory for the response cache
    #[arg(long, env = "STRAPI_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,
}
