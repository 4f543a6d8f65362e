//! Request URL assembly.

use crate::types::{ApiVersion, BaseUrl, SortOrder, SortSpec};

use super::dialect::QueryDialect;

/// Page size the CMS applies when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Everything needed to render one collection query URL.
#[derive(Debug, Clone)]
pub struct QueryParams<'a> {
    /// Collection type, possibly with a sub-path or its own `?query`.
    pub collection: &'a str,
    /// Sort specification.
    pub sort: &'a SortSpec,
    /// Order for sort entries without their own.
    pub order: SortOrder,
    /// Page size.
    pub limit: u32,
    /// 1-based page number.
    pub page: u32,
    /// Pre-rendered fragments appended verbatim (populate, drafts, filters).
    pub extra: Vec<String>,
}

/// Builds request URLs against one Strapi instance.
///
/// # Example
///
/// ```
/// use strapi_core::query::{QueryParams, UrlBuilder};
/// use strapi_core::{ApiVersion, BaseUrl, SortOrder, SortSpec};
///
/// let builder = UrlBuilder::new(BaseUrl::new("http://localhost:1337/api").unwrap(), ApiVersion::V4);
/// let sort = SortSpec::Field("title".into());
/// let url = builder.query_url(&QueryParams {
///     collection: "articles",
///     sort: &sort,
///     order: SortOrder::Asc,
///     limit: 20,
///     page: 2,
///     extra: vec![],
/// });
/// assert_eq!(
///     url,
///     "http://localhost:1337/api/articles?sort=title:ASC&pagination[pageSize]=20&pagination[page]=2"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: BaseUrl,
    dialect: &'static dyn QueryDialect,
}

impl UrlBuilder {
    /// Create a builder for `base`, speaking the dialect of `version`.
    pub fn new(base: BaseUrl, version: ApiVersion) -> Self {
        Self {
            base,
            dialect: version.dialect(),
        }
    }

    /// The dialect in use.
    pub fn dialect(&self) -> &'static dyn QueryDialect {
        self.dialect
    }

    /// The base URL.
    pub fn base(&self) -> &BaseUrl {
        &self.base
    }

    /// Plain endpoint URL (`{base}/{path}`), used for writes.
    pub fn endpoint(&self, path: &str) -> String {
        self.base.join(path)
    }

    /// Full query URL for a collection read.
    pub fn query_url(&self, params: &QueryParams<'_>) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(sort) = self.dialect.render_sort(params.sort, params.order) {
            parts.push(sort);
        }
        parts.extend(self.dialect.render_pagination(params.limit, params.page));
        parts.extend(
            params
                .extra
                .iter()
                .map(|fragment| fragment.trim_matches('&'))
                .filter(|fragment| !fragment.is_empty())
                .map(str::to_string),
        );

        let url = self.base.join(params.collection);
        if parts.is_empty() {
            return url;
        }

        let join = if params.collection.contains('?') {
            '&'
        } else {
            '?'
        };
        format!("{url}{join}{}", parts.join("&"))
    }
}
