//! Strapi API major version.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};
use crate::query::{LegacyDialect, QueryDialect, V4Dialect, V5Dialect};

/// A supported Strapi API major version.
///
/// The version picks the query dialect once, at construction; nothing
/// downstream branches on the number again.
///
/// # Example
///
/// ```
/// use strapi_core::ApiVersion;
///
/// let version: ApiVersion = "5".parse().unwrap();
/// assert!(version.is_modern());
/// assert!(version.dialect().supports_filters());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// Strapi v3 (`_sort`, `_limit`, `_start`).
    V3,
    /// Strapi v4 (`data`/`attributes` envelopes).
    #[default]
    V4,
    /// Strapi v5 (flat `data`, `status=draft`).
    V5,
}

impl ApiVersion {
    /// Returns the major version number.
    pub fn major(self) -> u8 {
        match self {
            ApiVersion::V3 => 3,
            ApiVersion::V4 => 4,
            ApiVersion::V5 => 5,
        }
    }

    /// True for the v4/v5 query dialect.
    pub fn is_modern(self) -> bool {
        !matches!(self, ApiVersion::V3)
    }

    /// The query dialect for this version.
    pub fn dialect(self) -> &'static dyn QueryDialect {
        match self {
            ApiVersion::V3 => &LegacyDialect,
            ApiVersion::V4 => &V4Dialect,
            ApiVersion::V5 => &V5Dialect,
        }
    }

    /// Shape a JSON request body for a write call.
    ///
    /// The modern API expects the payload inside a `{"data": ...}` envelope.
    pub fn wrap_payload(self, body: Value) -> Value {
        if self.is_modern() {
            json!({ "data": body })
        } else {
            body
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major())
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches(['v', 'V']) {
            "3" => Ok(ApiVersion::V3),
            "4" => Ok(ApiVersion::V4),
            "5" => Ok(ApiVersion::V5),
            _ => Err(InvalidInputError::ApiVersion {
                value: s.to_string(),
            }
            .into()),
        }
    }
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.major())
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        let raw = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        };
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_versions() {
        assert_eq!("3".parse::<ApiVersion>().unwrap(), ApiVersion::V3);
        assert_eq!("v4".parse::<ApiVersion>().unwrap(), ApiVersion::V4);
        assert_eq!(" 5 ".parse::<ApiVersion>().unwrap(), ApiVersion::V5);
    }

    #[test]
    fn rejects_unsupported_versions() {
        assert!("2".parse::<ApiVersion>().is_err());
        assert!("six".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn deserializes_number_or_string() {
        let v: ApiVersion = serde_json::from_str("5").unwrap();
        assert_eq!(v, ApiVersion::V5);
        let v: ApiVersion = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(v, ApiVersion::V3);
        assert!(serde_json::from_str::<ApiVersion>("7").is_err());
    }

    #[test]
    fn wraps_payload_only_on_modern_api() {
        let body = json!({"title": "Hello"});
        assert_eq!(
            ApiVersion::V4.wrap_payload(body.clone()),
            json!({"data": {"title": "Hello"}})
        );
        assert_eq!(ApiVersion::V3.wrap_payload(body.clone()), body);
    }
}
