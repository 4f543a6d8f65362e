//! Version-specific query dialects.

use std::fmt;

use crate::types::{ApiVersion, Populate, SortOrder, SortSpec};

use super::filter::Operator;
use super::url::DEFAULT_PAGE_SIZE;

/// Renders query-string fragments for one Strapi API generation.
///
/// Every method returns complete `key=value` fragments (without a leading
/// `&`), or nothing when the parameter should be omitted.
pub trait QueryDialect: Send + Sync + fmt::Debug {
    /// The API version this dialect speaks.
    fn version(&self) -> ApiVersion;

    /// Sort parameter(s).
    fn render_sort(&self, sort: &SortSpec, default_order: SortOrder) -> Option<String>;

    /// Pagination parameters; defaults are omitted so equivalent queries
    /// produce byte-identical URLs.
    fn render_pagination(&self, limit: u32, page: u32) -> Vec<String>;

    /// Whether field filters are understood at all.
    fn supports_filters(&self) -> bool;

    /// One filter predicate on a (possibly nested) field path.
    fn render_filter(&self, path: &[&str], operator: &Operator, value: &str) -> Option<String>;

    /// Relation population clause.
    fn render_populate(&self, populate: &Populate, deep: u32) -> Option<String>;

    /// Clause requesting unpublished (draft) content.
    fn render_drafts(&self) -> &'static str;
}

/// Strapi v3: `_sort`, `_limit`, `_start`; no filters or populate params.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDialect;

/// Strapi v4: `sort`, `pagination[...]`, `filters[...]`, `publicationState`.
#[derive(Debug, Clone, Copy, Default)]
pub struct V4Dialect;

/// Strapi v5: as v4, but drafts are requested with `status=draft`.
#[derive(Debug, Clone, Copy, Default)]
pub struct V5Dialect;

impl QueryDialect for LegacyDialect {
    fn version(&self) -> ApiVersion {
        ApiVersion::V3
    }

    fn render_sort(&self, sort: &SortSpec, default_order: SortOrder) -> Option<String> {
        render_sort_with_key("_sort", sort, default_order)
    }

    fn render_pagination(&self, limit: u32, page: u32) -> Vec<String> {
        let mut params = Vec::new();
        if limit != DEFAULT_PAGE_SIZE {
            params.push(format!("_limit={limit}"));
        }
        let start = u64::from(page.saturating_sub(1)) * u64::from(limit);
        if start > 0 {
            params.push(format!("_start={start}"));
        }
        params
    }

    fn supports_filters(&self) -> bool {
        false
    }

    fn render_filter(&self, _path: &[&str], _operator: &Operator, _value: &str) -> Option<String> {
        None
    }

    fn render_populate(&self, _populate: &Populate, _deep: u32) -> Option<String> {
        // v3 populates first-level relations by itself.
        None
    }

    fn render_drafts(&self) -> &'static str {
        "_publicationState=preview"
    }
}

impl QueryDialect for V4Dialect {
    fn version(&self) -> ApiVersion {
        ApiVersion::V4
    }

    fn render_sort(&self, sort: &SortSpec, default_order: SortOrder) -> Option<String> {
        render_sort_with_key("sort", sort, default_order)
    }

    fn render_pagination(&self, limit: u32, page: u32) -> Vec<String> {
        modern_pagination(limit, page)
    }

    fn supports_filters(&self) -> bool {
        true
    }

    fn render_filter(&self, path: &[&str], operator: &Operator, value: &str) -> Option<String> {
        Some(modern_filter(path, operator, value))
    }

    fn render_populate(&self, populate: &Populate, deep: u32) -> Option<String> {
        modern_populate(populate, deep)
    }

    fn render_drafts(&self) -> &'static str {
        "publicationState=preview"
    }
}

impl QueryDialect for V5Dialect {
    fn version(&self) -> ApiVersion {
        ApiVersion::V5
    }

    fn render_sort(&self, sort: &SortSpec, default_order: SortOrder) -> Option<String> {
        render_sort_with_key("sort", sort, default_order)
    }

    fn render_pagination(&self, limit: u32, page: u32) -> Vec<String> {
        modern_pagination(limit, page)
    }

    fn supports_filters(&self) -> bool {
        true
    }

    fn render_filter(&self, path: &[&str], operator: &Operator, value: &str) -> Option<String> {
        Some(modern_filter(path, operator, value))
    }

    fn render_populate(&self, populate: &Populate, deep: u32) -> Option<String> {
        modern_populate(populate, deep)
    }

    fn render_drafts(&self) -> &'static str {
        "status=draft"
    }
}

fn render_sort_with_key(key: &str, sort: &SortSpec, default_order: SortOrder) -> Option<String> {
    match sort {
        SortSpec::None => None,
        SortSpec::Field(field) if field.is_empty() => None,
        SortSpec::Field(field) => Some(format!("{key}={field}:{default_order}")),
        SortSpec::Fields(fields) if fields.is_empty() => None,
        SortSpec::Fields(fields) => Some(
            fields
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    let order = entry.order.unwrap_or(default_order);
                    format!("{key}[{index}]={}:{order}", entry.field)
                })
                .collect::<Vec<_>>()
                .join("&"),
        ),
    }
}

fn modern_pagination(limit: u32, page: u32) -> Vec<String> {
    let mut params = Vec::new();
    if limit != DEFAULT_PAGE_SIZE {
        params.push(format!("pagination[pageSize]={limit}"));
    }
    if page > 1 {
        params.push(format!("pagination[page]={page}"));
    }
    params
}

fn modern_filter(path: &[&str], operator: &Operator, value: &str) -> String {
    let encoded: String = ::url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
    format!("filters[{}][{}]={}", path.join("]["), operator, encoded)
}

fn modern_populate(populate: &Populate, deep: u32) -> Option<String> {
    match populate {
        Populate::None => None,
        Populate::All if deep > 0 => Some(format!("populate=deep,{deep}")),
        Populate::All => Some("populate=*".to_string()),
        Populate::Custom(fields) if fields.is_empty() => None,
        Populate::Custom(fields) => Some(
            fields
                .iter()
                .map(|entry| {
                    let nested = entry.nested.as_deref().unwrap_or("*");
                    format!("populate[{}][populate]={}", entry.field, nested)
                })
                .collect::<Vec<_>>()
                .join("&"),
        ),
    }
}
