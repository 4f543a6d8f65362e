//! Field filters.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::dialect::QueryDialect;

/// A filter comparison operator token, e.g. `$eq` or `$containsi`.
///
/// The known Strapi operators are available as constants; any other token
/// is rendered verbatim.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Operator(Cow<'static, str>);

impl Operator {
    pub const EQUALS: Operator = Operator(Cow::Borrowed("$eq"));
    pub const EQUALS_CASE_INSENSITIVE: Operator = Operator(Cow::Borrowed("$eqi"));
    pub const NOT_EQUALS: Operator = Operator(Cow::Borrowed("$ne"));
    pub const LESS_THAN: Operator = Operator(Cow::Borrowed("$lt"));
    pub const LESS_THAN_OR_EQUAL: Operator = Operator(Cow::Borrowed("$lte"));
    pub const GREATER_THAN: Operator = Operator(Cow::Borrowed("$gt"));
    pub const GREATER_THAN_OR_EQUAL: Operator = Operator(Cow::Borrowed("$gte"));
    pub const IN: Operator = Operator(Cow::Borrowed("$in"));
    pub const NOT_IN: Operator = Operator(Cow::Borrowed("$notIn"));
    pub const CONTAINS: Operator = Operator(Cow::Borrowed("$contains"));
    pub const NOT_CONTAINS: Operator = Operator(Cow::Borrowed("$notContains"));
    pub const CONTAINS_CASE_INSENSITIVE: Operator = Operator(Cow::Borrowed("$containsi"));
    pub const NOT_CONTAINS_CASE_INSENSITIVE: Operator = Operator(Cow::Borrowed("$notContainsi"));
    pub const IS_NULL: Operator = Operator(Cow::Borrowed("$null"));
    pub const NOT_NULL: Operator = Operator(Cow::Borrowed("$notNull"));
    pub const BETWEEN: Operator = Operator(Cow::Borrowed("$between"));
    pub const STARTS_WITH: Operator = Operator(Cow::Borrowed("$startsWith"));
    pub const ENDS_WITH: Operator = Operator(Cow::Borrowed("$endsWith"));

    /// An arbitrary operator token.
    pub fn new(token: impl Into<String>) -> Self {
        Operator(Cow::Owned(token.into()))
    }

    /// Returns the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Operator {
    fn default() -> Self {
        Operator::EQUALS
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Operator {
    fn from(token: &str) -> Self {
        Operator::new(token)
    }
}

impl From<String> for Operator {
    fn from(token: String) -> Self {
        Operator::new(token)
    }
}

/// Filter predicates on one field.
///
/// Holds at most one value per operator (last write wins), plus the names
/// of synthetic `$or.<i>.<field>` / `$and.<i>.<field>` entries registered
/// from this field, which are cleared along with it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldFilter {
    name: String,
    predicates: BTreeMap<Operator, String>,
    linked: Vec<String>,
}

impl FieldFilter {
    /// An empty filter on `name` (dot notation for nested relations).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active predicates, keyed by operator.
    pub fn predicates(&self) -> &BTreeMap<Operator, String> {
        &self.predicates
    }

    /// Names of synthetic filters registered from this field.
    pub fn linked(&self) -> &[String] {
        &self.linked
    }

    /// True when nothing would be rendered.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Set the value for one operator, replacing any previous value.
    pub fn filter(&mut self, value: impl fmt::Display, operator: impl Into<Operator>) -> &mut Self {
        self.predicates.insert(operator.into(), value.to_string());
        self
    }

    /// Remove the value for one operator.
    pub fn clear_filter(&mut self, operator: &Operator) -> &mut Self {
        self.predicates.remove(operator);
        self
    }

    /// Query-string fragments for this field.
    pub fn render(&self, dialect: &dyn QueryDialect) -> Vec<String> {
        if !dialect.supports_filters() {
            return Vec::new();
        }
        let path: Vec<&str> = self.name.split('.').collect();
        self.predicates
            .iter()
            .filter_map(|(operator, value)| dialect.render_filter(&path, operator, value))
            .collect()
    }

    fn link(&mut self, name: String) {
        if !self.linked.contains(&name) {
            self.linked.push(name);
        }
    }
}

/// All field filters of one query, keyed by field name.
///
/// Fields render in name order so two logically equal filter sets always
/// produce the same URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSet {
    fields: BTreeMap<String, FieldFilter>,
}

impl FilterSet {
    /// An empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter for `name`, created on first access.
    pub fn field_mut(&mut self, name: &str) -> &mut FieldFilter {
        self.fields
            .entry(name.to_string())
            .or_insert_with(|| FieldFilter::new(name))
    }

    /// The filter for `name`, if one was ever registered.
    pub fn field(&self, name: &str) -> Option<&FieldFilter> {
        self.fields.get(name)
    }

    /// Iterate all registered field filters.
    pub fn iter(&self) -> impl Iterator<Item = &FieldFilter> {
        self.fields.values()
    }

    /// True when no predicate is active on any field.
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(FieldFilter::is_empty)
    }

    /// Set `operator = value` on `field`.
    pub fn filter(
        &mut self,
        field: &str,
        value: impl fmt::Display,
        operator: impl Into<Operator>,
    ) -> &mut Self {
        self.field_mut(field).filter(value, operator);
        self
    }

    /// Remove one operator from `field`.
    pub fn clear_filter(&mut self, field: &str, operator: &Operator) -> &mut Self {
        if let Some(filter) = self.fields.get_mut(field) {
            filter.clear_filter(operator);
        }
        self
    }

    /// Clear every predicate on `field` and, transitively, on the synthetic
    /// filters linked to it.
    pub fn clear_filters(&mut self, field: &str) -> &mut Self {
        let mut pending = vec![field.to_string()];
        let mut seen = BTreeSet::new();

        while let Some(name) = pending.pop() {
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(filter) = self.fields.get_mut(&name) {
                filter.predicates.clear();
                pending.extend(filter.linked.iter().cloned());
            }
        }
        self
    }

    /// Drop every field filter.
    pub fn clear_all(&mut self) -> &mut Self {
        self.fields.clear();
        self
    }

    /// Match `field` against any of `values`.
    ///
    /// Registers `$or.<i>.<field>` per value, linked to `field`.
    pub fn value_or<V: fmt::Display>(
        &mut self,
        field: &str,
        values: &[V],
        operator: impl Into<Operator>,
    ) -> &mut Self {
        let operator = operator.into();
        for (index, value) in values.iter().enumerate() {
            let synthetic = format!("$or.{index}.{field}");
            self.field_mut(&synthetic).filter(value, operator.clone());
            self.field_mut(field).link(synthetic);
        }
        self
    }

    /// Match `value` against `field` or any of `other_fields`.
    ///
    /// Registers `$or.<i>.<path>` per field (the origin first), linked to `field`.
    pub fn value_in(
        &mut self,
        field: &str,
        value: impl fmt::Display,
        other_fields: &[&str],
        operator: impl Into<Operator>,
    ) -> &mut Self {
        self.multi_filter("$or", field, &value.to_string(), other_fields, operator.into())
    }

    /// Same registration as [`FilterSet::value_in`].
    #[deprecated(note = "use value_in")]
    pub fn or(
        &mut self,
        field: &str,
        value: impl fmt::Display,
        operator: impl Into<Operator>,
        fields: &[&str],
    ) -> &mut Self {
        self.multi_filter("$or", field, &value.to_string(), fields, operator.into())
    }

    /// Registers `$and.<i>.<path>` per field (the origin first), linked to `field`.
    #[deprecated(note = "combine filters on separate fields instead")]
    pub fn and(
        &mut self,
        field: &str,
        value: impl fmt::Display,
        operator: impl Into<Operator>,
        fields: &[&str],
    ) -> &mut Self {
        self.multi_filter("$and", field, &value.to_string(), fields, operator.into())
    }

    /// Query-string fragments for every active predicate.
    pub fn render(&self, dialect: &dyn QueryDialect) -> Vec<String> {
        self.fields
            .values()
            .flat_map(|filter| filter.render(dialect))
            .collect()
    }

    fn multi_filter(
        &mut self,
        prefix: &str,
        field: &str,
        value: &str,
        other_fields: &[&str],
        operator: Operator,
    ) -> &mut Self {
        let targets = std::iter::once(field).chain(other_fields.iter().copied());
        for (index, target) in targets.enumerate() {
            let synthetic = format!("{prefix}.{index}.{target}");
            self.field_mut(&synthetic).filter(value, operator.clone());
            self.field_mut(field).link(synthetic);
        }
        self
    }
}
