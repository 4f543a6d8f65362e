//! Subcommand implementations.

pub mod cache;
pub mod find;
pub mod query;
pub mod token;
pub mod write;

use anyhow::Result;

use crate::cli::{Commands, ConnectionArgs};
use crate::client;

pub async fn handle(command: Commands, connection: &ConnectionArgs) -> Result<()> {
    let strapi = client::connect(connection)?;

    match command {
        Commands::Query(args) => query::run(args, &strapi).await,
        Commands::FindOne(args) => query::run_find_one(args, &strapi).await,
        Commands::FindById(args) => find::run_by_id(args, &strapi).await,
        Commands::Custom(args) => find::run_custom(args, &strapi).await,
        Commands::Create(args) => write::run_create(args, &strapi).await,
        Commands::Update(args) => write::run_update(args, &strapi).await,
        Commands::Delete(args) => write::run_delete(args, &strapi).await,
        Commands::DeleteUpload(args) => write::run_delete_upload(args, &strapi).await,
        Commands::ClearCache(args) => cache::run(args, &strapi).await,
        Commands::Token(args) => token::run(args, &strapi).await,
    }
}
