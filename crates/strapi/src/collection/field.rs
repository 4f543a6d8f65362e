//! Per-field filter scope.

use std::fmt;

use strapi_core::Operator;

use super::CollectionQuery;

/// A [`CollectionQuery`] narrowed to one field, returned by
/// [`CollectionQuery::field`].
///
/// Every method applies to that field and hands the query back, so chains
/// continue on the query:
///
/// ```no_run
/// # use strapi::{Operator, Strapi, StrapiConfig};
/// # fn example(strapi: Strapi) {
/// let query = strapi
///     .collection("articles")
///     .field("title")
///     .filter("rust", Operator::CONTAINS_CASE_INSENSITIVE)
///     .field("category.slug")
///     .value_or(&["news", "blog"], Operator::EQUALS);
/// # }
/// ```
#[derive(Debug)]
#[must_use = "a field scope does nothing until a filter method is called"]
pub struct FieldScope {
    query: CollectionQuery,
    name: String,
}

impl FieldScope {
    pub(crate) fn new(query: CollectionQuery, name: String) -> Self {
        Self { query, name }
    }

    /// The field path this scope filters on.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set `operator = value`, replacing an earlier value for the same operator.
    pub fn filter(mut self, value: impl fmt::Display, operator: impl Into<Operator>) -> CollectionQuery {
        self.query.filters_mut().filter(&self.name, value, operator);
        self.query
    }

    /// Remove one operator.
    pub fn clear_filter(mut self, operator: impl Into<Operator>) -> CollectionQuery {
        self.query
            .filters_mut()
            .clear_filter(&self.name, &operator.into());
        self.query
    }

    /// Remove every operator, including the alternatives registered by
    /// [`FieldScope::value_or`] and [`FieldScope::value_in`].
    pub fn clear_filters(mut self) -> CollectionQuery {
        self.query.filters_mut().clear_filters(&self.name);
        self.query
    }

    /// Match any of `values`.
    pub fn value_or<V: fmt::Display>(mut self, values: &[V], operator: impl Into<Operator>) -> CollectionQuery {
        self.query
            .filters_mut()
            .value_or(&self.name, values, operator);
        self.query
    }

    /// Match `value` on this field or on any of `other_fields`.
    pub fn value_in(
        mut self,
        value: impl fmt::Display,
        other_fields: &[&str],
        operator: impl Into<Operator>,
    ) -> CollectionQuery {
        self.query
            .filters_mut()
            .value_in(&self.name, value, other_fields, operator);
        self.query
    }

    #[deprecated(note = "use value_in")]
    #[allow(deprecated)]
    pub fn or(mut self, value: impl fmt::Display, operator: impl Into<Operator>, fields: &[&str]) -> CollectionQuery {
        self.query
            .filters_mut()
            .or(&self.name, value, operator, fields);
        self.query
    }

    #[deprecated(note = "combine filters on separate fields instead")]
    #[allow(deprecated)]
    pub fn and(mut self, value: impl fmt::Display, operator: impl Into<Operator>, fields: &[&str]) -> CollectionQuery {
        self.query
            .filters_mut()
            .and(&self.name, value, operator, fields);
        self.query
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use strapi_cache::MemoryCache;
    use strapi_core::{Operator, StrapiConfig};
    use strapi_http::HttpTransport;

    use crate::Strapi;

    fn strapi() -> Strapi {
        let config = StrapiConfig::from_url("https://cms.example.com/api").unwrap();
        let transport = HttpTransport::from_config(&config).unwrap();
        Strapi::with_backends(config, Arc::new(transport), Arc::new(MemoryCache::new())).unwrap()
    }

    fn filters_of(url: &str) -> Vec<&str> {
        url.split(['?', '&'])
            .filter(|part| part.starts_with("filters"))
            .collect()
    }

    #[test]
    fn operators_accumulate_per_field() {
        let query = strapi()
            .collection("articles")
            .field("views")
            .filter(10, Operator::GREATER_THAN)
            .field("views")
            .filter(100, Operator::LESS_THAN)
            .field("views")
            .filter(50, Operator::GREATER_THAN);
        assert_eq!(
            filters_of(&query.url()),
            vec!["filters[views][$gt]=50", "filters[views][$lt]=100"]
        );
    }

    #[test]
    fn clear_filter_removes_one_operator() {
        let query = strapi()
            .collection("articles")
            .field("views")
            .filter(10, Operator::GREATER_THAN)
            .field("views")
            .filter(100, Operator::LESS_THAN)
            .field("views")
            .clear_filter(Operator::GREATER_THAN);
        assert_eq!(filters_of(&query.url()), vec!["filters[views][$lt]=100"]);
    }

    #[test]
    fn value_or_registers_indexed_alternatives() {
        let query = strapi()
            .collection("articles")
            .field("slug")
            .value_or(&["a", "b"], Operator::EQUALS);
        assert_eq!(
            filters_of(&query.url()),
            vec!["filters[$or][0][slug][$eq]=a", "filters[$or][1][slug][$eq]=b"]
        );
    }

    #[test]
    fn value_in_searches_several_fields() {
        let query = strapi()
            .collection("articles")
            .field("title")
            .value_in("rust", &["summary"], Operator::CONTAINS);
        assert_eq!(
            filters_of(&query.url()),
            vec![
                "filters[$or][0][title][$contains]=rust",
                "filters[$or][1][summary][$contains]=rust",
            ]
        );
    }

    #[test]
    fn clear_filters_follows_linked_alternatives() {
        let query = strapi()
            .collection("articles")
            .field("slug")
            .value_or(&["a", "b"], Operator::EQUALS)
            .field("title")
            .filter("x", Operator::EQUALS)
            .field("slug")
            .clear_filters();
        assert_eq!(filters_of(&query.url()), vec!["filters[title][$eq]=x"]);
    }

    #[test]
    #[allow(deprecated)]
    fn legacy_and_uses_and_prefix() {
        let query = strapi()
            .collection("articles")
            .field("title")
            .and("x", Operator::EQUALS, &["summary"]);
        assert_eq!(
            filters_of(&query.url()),
            vec![
                "filters[$and][0][title][$eq]=x",
                "filters[$and][1][summary][$eq]=x",
            ]
        );
    }

    #[test]
    fn clear_all_filters_empties_the_set() {
        let query = strapi()
            .collection("articles")
            .field("title")
            .filter("x", Operator::EQUALS)
            .clear_all_filters();
        assert!(query.filters().is_empty());
        assert!(filters_of(&query.url()).is_empty());
    }
}
