//! Token command implementation.

use anyhow::{Context, Result};
use clap::Args;

use strapi::{Strapi, TokenClaims};

use crate::output;

#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Print the raw token
    #[arg(long)]
    pub show: bool,

    /// Evict the cached login token instead
    #[arg(long, conflicts_with = "show")]
    pub forget: bool,
}

pub async fn run(args: TokenArgs, strapi: &Strapi) -> Result<()> {
    if args.forget {
        strapi
            .tokens()
            .forget()
            .await
            .context("Failed to evict cached token")?;
        output::success("Forgot cached login token");
        return Ok(());
    }

    let method = strapi.tokens().auth().name();
    output::field("Method", method);

    let Some(token) = strapi.bearer().await.context("Failed to obtain token")? else {
        output::notice("Public access sends no token.");
        return Ok(());
    };

    let claims = TokenClaims::decode(&token).ok();
    if let Some(issued) = claims.as_ref().and_then(TokenClaims::issued_at) {
        output::time_field("Issued", issued);
    }
    match claims.as_ref().and_then(TokenClaims::expires_at) {
        Some(expires) => output::time_field("Expires", expires),
        None => output::field("Expires", "never"),
    }

    if args.show {
        output::field("Token", token.as_str());
    }

    Ok(())
}
