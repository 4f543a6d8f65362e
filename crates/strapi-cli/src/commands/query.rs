//! Query and find-one command implementations.

use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;

use strapi::{CollectionQuery, SortField, SortOrder, Strapi};

use crate::output;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Collection type, e.g. articles
    pub collection: String,

    /// Sort field, optionally with a direction (title, title:ASC); repeatable
    #[arg(long)]
    pub sort: Vec<SortField>,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,

    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,

    /// Newest published entries first, limited to N
    #[arg(long, value_name = "N", conflicts_with_all = ["sort", "limit", "page"])]
    pub recent: Option<u32>,

    /// Relation to populate; repeatable (default: all first-level relations)
    #[arg(long)]
    pub populate: Vec<String>,

    /// Do not populate relations
    #[arg(long, conflicts_with = "populate")]
    pub no_populate: bool,

    /// Deep-populate depth, overriding --populate-deep
    #[arg(long)]
    pub deep: Option<u32>,

    /// Include unpublished entries
    #[arg(long)]
    pub drafts: bool,

    /// Filter as FIELD[:OPERATOR]=VALUE, e.g. author.name:eq=John; repeatable
    #[arg(long)]
    pub filter: Vec<FilterArg>,

    /// Keep the data/attributes envelopes
    #[arg(long)]
    pub no_flatten: bool,

    /// Bypass the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Print the response metadata to stderr
    #[arg(long)]
    pub meta: bool,

    /// Print the request URL instead of running the query
    #[arg(long)]
    pub url_only: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// One `--filter` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl FromStr for FilterArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD[:OPERATOR]=VALUE, got '{s}'"))?;

        let (field, operator) = match target.split_once(':') {
            Some((field, operator)) if !operator.is_empty() => {
                let operator = if operator.starts_with('$') {
                    operator.to_string()
                } else {
                    format!("${operator}")
                };
                (field, operator)
            }
            _ => (target.trim_end_matches(':'), "$eq".to_string()),
        };

        if field.is_empty() {
            return Err(format!("missing field name in '{s}'"));
        }

        Ok(Self {
            field: field.to_string(),
            operator,
            value: value.to_string(),
        })
    }
}

impl QueryArgs {
    /// Query configured from the arguments.
    pub fn build(&self, strapi: &Strapi) -> CollectionQuery {
        let mut query = strapi
            .collection(&self.collection)
            .sort_order(SortOrder::from_ascending(self.asc));

        if let Some(count) = self.recent {
            query = query.recent(count);
        }

        query = match self.sort.as_slice() {
            [] => query,
            [single] if single.order.is_none() => query.sort(single.field.clone()),
            fields => query.sort_by(fields.to_vec()),
        };

        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }
        if let Some(page) = self.page {
            query = query.page(page);
        }

        if self.no_populate {
            query = query.no_populate();
        } else if !self.populate.is_empty() {
            query = query.populate(self.populate.iter().map(String::as_str));
        }
        if let Some(depth) = self.deep {
            query = query.deep(depth);
        }

        for filter in &self.filter {
            query = query
                .field(&filter.field)
                .filter(&filter.value, filter.operator.as_str());
        }

        query.drafts(self.drafts).flatten(!self.no_flatten)
    }
}

pub async fn run(args: QueryArgs, strapi: &Strapi) -> Result<()> {
    let mut query = args.build(strapi);

    if args.url_only {
        println!("{}", query.url());
        return Ok(());
    }

    let records = query
        .query(!args.no_cache)
        .await
        .context("Failed to query collection")?;

    output::records(&records, args.pretty)?;

    if args.meta {
        eprintln!("{}", serde_json::to_string_pretty(query.meta())?);
    }

    Ok(())
}

pub async fn run_find_one(args: QueryArgs, strapi: &Strapi) -> Result<()> {
    let mut query = args.build(strapi);

    if args.url_only {
        println!("{}", query.limit(1).url());
        return Ok(());
    }

    match query
        .find_one(!args.no_cache)
        .await
        .context("Failed to fetch record")?
    {
        Some(record) => output::value(&record, args.pretty)?,
        None => output::notice("No record found."),
    }

    Ok(())
}
