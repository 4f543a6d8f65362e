//! Expiry claim decoding.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use strapi_core::error::TokenError;
use strapi_core::{BearerToken, Result};

/// URL-safe alphabet, padded or not.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims read from a login token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiry as a Unix timestamp.
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issue time as a Unix timestamp.
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of `token`.
    ///
    /// The signature is not verified; the server does that.
    pub fn decode(token: &BearerToken) -> Result<Self> {
        let segment = token.payload_segment().ok_or_else(|| malformed("missing payload segment"))?;
        let bytes = URL_SAFE_LENIENT
            .decode(segment)
            .map_err(|e| malformed(&format!("payload is not base64url: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| malformed(&format!("payload is not a claims object: {e}")).into())
    }

    /// Expiry time, if the token declares one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Issue time, if the token declares one.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|iat| Utc.timestamp_opt(iat, 0).single())
    }

    /// True when the expiry lies before `now`. Tokens without an expiry
    /// never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| exp < now.timestamp())
    }
}

fn malformed(reason: &str) -> TokenError {
    TokenError::Malformed {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
pub(crate) fn fake_token(exp: i64) -> BearerToken {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"id":1,"iat":{},"exp":{exp}}}"#, exp - 600));
    BearerToken::new(format!("{header}.{payload}.signature"))
}
