//! Sort specification types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire token (`ASC` / `DESC`).
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// `Asc` when `ascending` is true, `Desc` otherwise.
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(InvalidInputError::Other {
                message: format!("unknown sort order '{s}' (expected ASC or DESC)"),
            }
            .into()),
        }
    }
}

/// One entry of a multi-field sort.
///
/// Without an explicit order the query's default order applies.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortField {
    /// Field name.
    pub field: String,
    /// Per-field order overriding the default.
    pub order: Option<SortOrder>,
}

impl SortField {
    /// Sort by `field` using the default order.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: None,
        }
    }

    /// Sort by `field` in the given order.
    pub fn with_order(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order: Some(order),
        }
    }
}

impl From<&str> for SortField {
    fn from(field: &str) -> Self {
        SortField::new(field)
    }
}

impl From<(&str, SortOrder)> for SortField {
    fn from((field, order): (&str, SortOrder)) -> Self {
        SortField::with_order(field, order)
    }
}

impl FromStr for SortField {
    type Err = Error;

    /// Parses `field` or `field:ASC` / `field:DESC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((field, order)) => Ok(SortField::with_order(field, order.parse()?)),
            None => Ok(SortField::new(s)),
        }
    }
}

/// What to sort by.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortSpec {
    /// No sort parameter at all.
    None,
    /// A single field in the default order.
    Field(String),
    /// An ordered list of fields, rendered as indexed entries.
    Fields(Vec<SortField>),
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec::Field("id".to_string())
    }
}

impl SortSpec {
    /// True when no sort parameter will be rendered.
    pub fn is_empty(&self) -> bool {
        match self {
            SortSpec::None => true,
            SortSpec::Field(field) => field.is_empty(),
            SortSpec::Fields(fields) => fields.is_empty(),
        }
    }
}
