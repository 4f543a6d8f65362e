//! Relation population settings.

use serde::{Deserialize, Serialize};

/// Which relations the CMS should inline in the response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Populate {
    /// Leave relations as references.
    None,
    /// Populate every first-level relation (or deep-populate when a depth is set).
    #[default]
    All,
    /// Populate only the listed relations.
    Custom(Vec<PopulateField>),
}

/// One relation in a custom populate list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PopulateField {
    /// Relation name.
    pub field: String,
    /// Nested populate value; `*` when absent.
    pub nested: Option<String>,
}

impl PopulateField {
    /// Populate `field` and everything one level below it.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            nested: None,
        }
    }

    /// Populate `field` with an explicit nested populate value.
    pub fn nested(field: impl Into<String>, nested: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            nested: Some(nested.into()),
        }
    }
}

impl From<&str> for PopulateField {
    fn from(field: &str) -> Self {
        PopulateField::new(field)
    }
}

impl From<String> for PopulateField {
    fn from(field: String) -> Self {
        PopulateField::new(field)
    }
}
