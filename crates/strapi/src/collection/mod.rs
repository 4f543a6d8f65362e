//! Collection queries.

mod field;

pub use field::FieldScope;

use std::fmt;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use strapi_core::normalize::{into_records, split_meta};
use strapi_core::query::{DEFAULT_PAGE_SIZE, QueryParams};
use strapi_core::traits::remember;
use strapi_core::{
    FilterSet, Normalizer, Operator, Populate, PopulateField, Record, Result, SortField, SortOrder,
    SortSpec, UploadFile,
};

use crate::cache_index::{collection_index, item_pointer, items_index, sha256_hex};
use crate::client::{Strapi, write_outcome};

/// A configurable query against one collection type.
///
/// Configuration methods consume and return the query, so a chain reads
/// top to bottom and two handles never share filter state. Execution takes
/// `&mut self` and keeps the last records and meta for later inspection.
///
/// # Example
///
/// ```no_run
/// use strapi::{Operator, Strapi, StrapiConfig};
///
/// # async fn example() -> Result<(), strapi::Error> {
/// let strapi = Strapi::new(StrapiConfig::from_url("http://localhost:1337/api")?)?;
/// let mut query = strapi
///     .collection("articles")
///     .order("publishedAt", false)
///     .field("author.name")
///     .filter("John", Operator::EQUALS)
///     .limit(20);
///
/// let first_page = query.query(true).await?;
/// let total = &query.meta()["pagination"]["total"];
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CollectionQuery {
    client: Strapi,
    collection_type: String,
    sort: SortSpec,
    order: SortOrder,
    limit: u32,
    page: u32,
    filters: FilterSet,
    populate: Populate,
    deep: u32,
    drafts: bool,
    flatten: bool,
    squash: bool,
    absolute: bool,
    records: Vec<Record>,
    meta: Record,
}

impl fmt::Debug for CollectionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionQuery")
            .field("collection_type", &self.collection_type)
            .field("sort", &self.sort)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .field("page", &self.page)
            .field("filters", &self.filters)
            .field("populate", &self.populate)
            .field("deep", &self.deep)
            .field("drafts", &self.drafts)
            .finish_non_exhaustive()
    }
}

impl CollectionQuery {
    pub(crate) fn new(client: Strapi, collection_type: String) -> Self {
        let config = client.config();
        let deep = config.populate_deep();
        let squash = config.squash_image();
        let absolute = config.absolute_url();

        Self {
            client,
            collection_type,
            sort: SortSpec::default(),
            order: SortOrder::default(),
            limit: DEFAULT_PAGE_SIZE,
            page: 1,
            filters: FilterSet::new(),
            populate: Populate::default(),
            deep,
            drafts: false,
            flatten: true,
            squash,
            absolute,
            records: Vec::new(),
            meta: Record::new(),
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Sort by one field, keeping the current order.
    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.sort = SortSpec::Field(field.into());
        self
    }

    /// Sort by one field in the given direction.
    pub fn order(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort = SortSpec::Field(field.into());
        self.order = SortOrder::from_ascending(ascending);
        self
    }

    /// Default direction for sort fields without their own.
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Sort by several fields, each optionally with its own direction.
    /// An empty list disables sorting.
    pub fn sort_by<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<SortField>,
    {
        let fields: Vec<SortField> = fields.into_iter().map(Into::into).collect();
        self.sort = if fields.is_empty() {
            SortSpec::None
        } else {
            SortSpec::Fields(fields)
        };
        self
    }

    /// Page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// 1-based page number; 0 is read as 1.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Newest published entries first.
    pub fn recent(mut self, limit: u32) -> Self {
        let field = if self.client.config().version().is_modern() {
            "publishedAt"
        } else {
            "published_at"
        };
        self.sort = SortSpec::Field(field.to_string());
        self.limit = limit;
        self.page = 1;
        self
    }

    /// Populate exactly these relations.
    pub fn populate<I, P>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PopulateField>,
    {
        let fields: Vec<PopulateField> = fields.into_iter().map(Into::into).collect();
        self.populate = if fields.is_empty() {
            Populate::All
        } else {
            Populate::Custom(fields)
        };
        self
    }

    /// Add one relation with a nested populate value.
    pub fn populate_nested(mut self, field: impl Into<String>, nested: impl Into<String>) -> Self {
        let entry = PopulateField::nested(field, nested);
        match &mut self.populate {
            Populate::Custom(fields) => fields.push(entry),
            _ => self.populate = Populate::Custom(vec![entry]),
        }
        self
    }

    /// Send no populate parameter at all.
    pub fn no_populate(mut self) -> Self {
        self.populate = Populate::None;
        self
    }

    /// Deep-populate depth for the populate-deep plugin (0 = off).
    pub fn deep(mut self, depth: u32) -> Self {
        self.deep = depth;
        self
    }

    /// Include unpublished entries.
    pub fn drafts(mut self, enabled: bool) -> Self {
        self.drafts = enabled;
        self
    }

    /// Toggle `data`/`attributes` unwrapping.
    pub fn flatten(mut self, enabled: bool) -> Self {
        self.flatten = enabled;
        self
    }

    /// Toggle replacing media objects with their URL.
    pub fn squash(mut self, enabled: bool) -> Self {
        self.squash = enabled;
        self
    }

    /// Toggle prefixing relative asset URLs with the upload URL.
    pub fn absolute(mut self, enabled: bool) -> Self {
        self.absolute = enabled;
        self
    }

    /// Start filtering on `name` (dotted for nested fields).
    pub fn field(self, name: impl Into<String>) -> FieldScope {
        FieldScope::new(self, name.into())
    }

    /// Drop every filter.
    pub fn clear_all_filters(mut self) -> Self {
        self.filters.clear_all();
        self
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn collection_type(&self) -> &str {
        &self.collection_type
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn page_size(&self) -> u32 {
        self.limit
    }

    /// Records of the last execution.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Metadata of the last execution, with a `response` Unix timestamp.
    pub fn meta(&self) -> &Record {
        &self.meta
    }

    /// Request URL for the current configuration.
    pub fn url(&self) -> String {
        self.url_for(&self.collection_type)
    }

    fn url_for(&self, collection: &str) -> String {
        let urls = self.client.urls();
        let dialect = urls.dialect();

        let mut extra = Vec::new();
        if let Some(populate) = dialect.render_populate(&self.populate, self.deep) {
            extra.push(populate);
        }
        if self.drafts {
            extra.push(dialect.render_drafts().to_string());
        }
        extra.extend(self.filters.render(dialect));

        urls.query_url(&QueryParams {
            collection,
            sort: &self.sort,
            order: self.order,
            limit: self.limit,
            page: self.page,
            extra,
        })
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Run the query and return the normalized records.
    ///
    /// With `use_cache`, the raw response is cached under its URL and the
    /// URL is recorded in the collection's cache index.
    #[instrument(skip(self), fields(collection = %self.collection_type))]
    pub async fn query(&mut self, use_cache: bool) -> Result<Vec<Record>> {
        let collection = self.collection_type.clone();
        self.execute(&collection, use_cache).await
    }

    /// First record of the query, fetched with a page size of 1.
    ///
    /// With `use_cache`, the response is cached under a hash of its URL and
    /// the record's `id` (or a hash of its content) is recorded in the
    /// `<type>_items` index, so [`CollectionQuery::clear_item_cache`] can
    /// evict it.
    #[instrument(skip(self), fields(collection = %self.collection_type))]
    pub async fn find_one(&mut self, use_cache: bool) -> Result<Option<Record>> {
        let previous = self.limit;
        self.limit = 1;
        let result = self.fetch_first(use_cache).await;
        self.limit = previous;
        result
    }

    async fn fetch_first(&mut self, use_cache: bool) -> Result<Option<Record>> {
        let url = self.url();
        let item_key = sha256_hex(url.as_bytes());

        let body = if use_cache {
            let ttl = self.client.config().cache_ttl();
            remember(self.client.cache(), &item_key, ttl, || self.client.get_json(&url)).await?
        } else {
            self.client.get_json(&url).await?
        };

        let records = into_records(self.normalize(body)?);
        let first = records.first().cloned();
        self.records = records;

        if let (Some(record), true) = (&first, use_cache) {
            let id = match record.get("id") {
                Some(Value::String(id)) => id.clone(),
                Some(id) if !id.is_null() => id.to_string(),
                _ => sha256_hex(&serde_json::to_vec(&self.records)?),
            };
            let ttl = self.client.config().cache_ttl();
            self.client
                .cache()
                .put(&item_pointer(&self.collection_type, &id), Value::String(item_key), ttl)
                .await?;
            self.client
                .cache_index()
                .record(&items_index(&self.collection_type), &id)
                .await?;
        }

        Ok(first)
    }

    /// Look up one record by id.
    ///
    /// Tries `GET <type>/<id>` first, then the collection filtered on
    /// `id = <id>`. Configured filters are set aside for the lookup and
    /// restored afterwards.
    ///
    /// Returns `None` both when no record matches and when both lookups
    /// fail; the failure is only logged.
    #[instrument(skip(self), fields(collection = %self.collection_type))]
    pub async fn find_one_by_id(&mut self, id: impl fmt::Display + fmt::Debug, use_cache: bool) -> Option<Record> {
        let saved = std::mem::take(&mut self.filters);

        let found = match self.get_custom(&format!("/{id}"), use_cache).await {
            Ok(value) => Ok(first_record(value)),
            Err(err) => {
                warn!(error = %err, "direct lookup failed, retrying with an id filter");
                self.filters.filter("id", &id, Operator::EQUALS);
                self.find_one(use_cache).await
            }
        };

        self.filters = saved;
        match found {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "lookup by id failed");
                None
            }
        }
    }

    /// Run the query against `<type><path>` (e.g. `/3` or `/count`).
    ///
    /// The normalized body is returned as is, except that a one-element
    /// array is unwrapped to its element, whatever its type. The collection
    /// type itself is never changed.
    #[instrument(skip(self), fields(collection = %self.collection_type))]
    pub async fn get_custom(&mut self, path: &str, use_cache: bool) -> Result<Value> {
        let collection = format!("{}{}", self.collection_type, path);
        let value = self.fetch(&collection, use_cache).await?;
        self.records = into_records(value.clone());

        match value {
            Value::Array(mut items) if items.len() == 1 => Ok(items.remove(0)),
            value => Ok(value),
        }
    }

    async fn execute(&mut self, collection: &str, use_cache: bool) -> Result<Vec<Record>> {
        let value = self.fetch(collection, use_cache).await?;
        self.records = into_records(value);
        Ok(self.records.clone())
    }

    /// Fetch `collection` and normalize the body, recording its meta.
    async fn fetch(&mut self, collection: &str, use_cache: bool) -> Result<Value> {
        let url = self.url_for(collection);
        debug!(%url, use_cache, "executing query");

        let body = if use_cache {
            let ttl = self.client.config().cache_ttl();
            let body =
                remember(self.client.cache(), &url, ttl, || self.client.get_json(&url)).await?;
            self.client
                .cache_index()
                .record(&collection_index(&self.collection_type), &url)
                .await?;
            body
        } else {
            self.client.get_json(&url).await?
        };

        self.normalize(body)
    }

    fn normalize(&mut self, mut body: Value) -> Result<Value> {
        let config = self.client.config();
        let modern = config.version().is_modern();
        let normalizer = Normalizer::new()
            .flatten(self.flatten && modern)
            .absolute(self.absolute.then(|| config.upload_url().to_string()))
            .squash(self.squash);

        let mut meta = Record::new();
        meta.insert("response".to_string(), json!(Utc::now().timestamp()));
        if modern {
            if let Some(extra) = split_meta(&mut body) {
                meta.extend(extra);
            }
        }
        self.meta = meta;

        normalizer.normalize(body)
    }

    // ========================================================================
    // Cache invalidation
    // ========================================================================

    /// Evict every cached query of this collection, and with
    /// `including_items` every record cached by `find_one`.
    #[instrument(skip(self), fields(collection = %self.collection_type))]
    pub async fn clear_collection_cache(&self, including_items: bool) -> Result<()> {
        let index = self.client.cache_index();
        index.clear(&collection_index(&self.collection_type)).await?;

        if including_items {
            let items = items_index(&self.collection_type);
            for id in index.keys(&items).await? {
                self.forget_item(&id).await?;
            }
            self.client.cache().forget(&items).await?;
        }
        Ok(())
    }

    /// Evict the record cached for `id` by `find_one`.
    #[instrument(skip(self), fields(collection = %self.collection_type))]
    pub async fn clear_item_cache(&self, id: impl fmt::Display + fmt::Debug) -> Result<()> {
        let id = id.to_string();
        self.forget_item(&id).await?;
        self.client
            .cache_index()
            .remove(&items_index(&self.collection_type), &id)
            .await
    }

    async fn forget_item(&self, id: &str) -> Result<()> {
        let cache = self.client.cache();
        let pointer = item_pointer(&self.collection_type, id);
        if let Some(Value::String(key)) = cache.pull(&pointer).await? {
            cache.forget(&key).await?;
        }
        Ok(())
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Create an entry.
    #[instrument(skip(self, body), fields(collection = %self.collection_type))]
    pub async fn post(&self, body: Value) -> Result<Value> {
        let url = self.client.urls().endpoint(&self.collection_type);
        let payload = self.client.config().version().wrap_payload(body);
        let token = self.client.bearer().await?;
        debug!(%url, "POST request");

        let response = self.client.transport().post(&url, &payload, token.as_ref()).await?;
        write_outcome(&url, response)
    }

    /// Create an entry with attached files, sent as `multipart/form-data`.
    #[instrument(skip(self, body, files), fields(collection = %self.collection_type, files = files.len()))]
    pub async fn post_files(&self, body: Value, files: &[UploadFile]) -> Result<Value> {
        let url = self.client.urls().endpoint(&self.collection_type);
        let token = self.client.bearer().await?;
        debug!(%url, "multipart POST request");

        let response = self
            .client
            .transport()
            .post_multipart(&url, &body, files, token.as_ref())
            .await?;
        write_outcome(&url, response)
    }

    /// Update the entry `id`.
    #[instrument(skip(self, body), fields(collection = %self.collection_type))]
    pub async fn put(&self, id: impl fmt::Display + fmt::Debug, body: Value) -> Result<Value> {
        let url = self
            .client
            .urls()
            .endpoint(&format!("{}/{id}", self.collection_type));
        let payload = self.client.config().version().wrap_payload(body);
        let token = self.client.bearer().await?;
        debug!(%url, "PUT request");

        let response = self.client.transport().put(&url, &payload, token.as_ref()).await?;
        write_outcome(&url, response)
    }

    /// Delete the entry `id`.
    #[instrument(skip(self), fields(collection = %self.collection_type))]
    pub async fn delete(&self, id: impl fmt::Display + fmt::Debug) -> Result<Value> {
        let url = self
            .client
            .urls()
            .endpoint(&format!("{}/{id}", self.collection_type));
        let token = self.client.bearer().await?;
        debug!(%url, "DELETE request");

        let response = self.client.transport().delete(&url, token.as_ref()).await?;
        write_outcome(&url, response)
    }

    pub(crate) fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }
}

fn first_record(value: Value) -> Option<Record> {
    into_records(value).into_iter().next()
}
