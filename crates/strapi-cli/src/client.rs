//! Client construction from command-line settings.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use strapi::{AuthMethod, BaseUrl, FileCache, HttpTransport, Strapi, StrapiConfig, instance_scope};

use crate::cli::ConnectionArgs;

/// Build the library configuration from flags and `STRAPI_*` variables.
pub fn config(args: &ConnectionArgs) -> Result<StrapiConfig> {
    let url = args
        .url
        .as_deref()
        .context("No Strapi URL. Pass --url or set STRAPI_URL.")?;

    let auth = AuthMethod::parse(
        &args.auth,
        args.identifier.as_deref(),
        args.password.as_deref(),
        args.token.as_deref(),
    )
    .context("Invalid authentication settings")?;

    let mut config = StrapiConfig::from_url(url)
        .context("Invalid Strapi URL")?
        .with_version(args.api_version)
        .with_auth(auth)
        .with_cache_ttl(args.cache_ttl)
        .with_token_cache_ttl(args.token_cache_ttl)
        .with_cache_index_max_size(args.cache_index_max_size)
        .with_populate_deep(args.populate_deep)
        .with_squash_image(args.squash_image)
        .with_absolute_url(args.absolute_url)
        .with_timeout(args.timeout)
        .with_verify_ssl(!args.insecure)
        .with_compatibility_mode(args.compatibility_mode);

    if let Some(upload_url) = &args.upload_url {
        config = config.with_upload_url(BaseUrl::new(upload_url).context("Invalid upload URL")?);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Root under which each instance and identity gets its own cache.
fn cache_root(args: &ConnectionArgs) -> Result<PathBuf> {
    if let Some(dir) = &args.cache_dir {
        return Ok(dir.clone());
    }
    let dirs =
        ProjectDirs::from("", "", "strapi").context("Could not determine cache directory")?;
    Ok(dirs.cache_dir().to_path_buf())
}

/// Client with the HTTP transport and a file cache shared between runs.
pub fn connect(args: &ConnectionArgs) -> Result<Strapi> {
    let config = config(args)?;
    let dir = cache_root(args)?.join(instance_scope(&config));
    debug!(cache_dir = %dir.display(), "opening cache");

    let cache = FileCache::new(&dir).context("Failed to open cache directory")?;
    let transport = HttpTransport::from_config(&config).context("Failed to build HTTP client")?;

    Strapi::with_backends(config, Arc::new(transport), Arc::new(cache))
        .context("Failed to create client")
}
