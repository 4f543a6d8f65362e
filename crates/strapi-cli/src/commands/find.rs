//! Find-by-id and custom path command implementations.

use anyhow::{Context, Result, bail};
use clap::Args;

use strapi::Strapi;

use crate::output;

#[derive(Args, Debug)]
pub struct FindByIdArgs {
    /// Collection type, e.g. articles
    pub collection: String,

    /// Entry id (numeric id or document id)
    pub id: String,

    /// Bypass the response cache
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Args, Debug)]
pub struct CustomArgs {
    /// Collection type, e.g. articles
    pub collection: String,

    /// Path appended to the collection, e.g. /count or /3
    pub path: String,

    /// Bypass the response cache
    #[arg(long)]
    pub no_cache: bool,
}

pub async fn run_by_id(args: FindByIdArgs, strapi: &Strapi) -> Result<()> {
    let record = strapi
        .collection(&args.collection)
        .find_one_by_id(&args.id, !args.no_cache)
        .await;

    let Some(record) = record else {
        bail!("No record with id {} in {}", args.id, args.collection);
    };

    output::value(&record, true)
}

pub async fn run_custom(args: CustomArgs, strapi: &Strapi) -> Result<()> {
    let path = if args.path.starts_with('/') || args.path.starts_with('?') {
        args.path.clone()
    } else {
        format!("/{}", args.path)
    };

    let value = strapi
        .collection(&args.collection)
        .get_custom(&path, !args.no_cache)
        .await
        .with_context(|| format!("Failed to query {}{}", args.collection, path))?;

    output::value(&value, true)
}
