//! Cache clearing command implementation.

use anyhow::{Context, Result};
use clap::Args;

use strapi::Strapi;

use crate::output;

#[derive(Args, Debug)]
pub struct ClearCacheArgs {
    /// Collection type, e.g. articles
    pub collection: String,

    /// Also evict entries cached by find-one
    #[arg(long)]
    pub items: bool,

    /// Evict only the find-one entry with this id
    #[arg(long, conflicts_with = "items")]
    pub id: Option<String>,
}

pub async fn run(args: ClearCacheArgs, strapi: &Strapi) -> Result<()> {
    let query = strapi.collection(&args.collection);

    match &args.id {
        Some(id) => {
            query
                .clear_item_cache(id)
                .await
                .context("Failed to clear item cache")?;
            output::success(&format!("Cleared cached {} {}", args.collection, id));
        }
        None => {
            query
                .clear_collection_cache(args.items)
                .await
                .context("Failed to clear collection cache")?;
            output::success(&format!("Cleared cached queries of {}", args.collection));
        }
    }

    Ok(())
}
