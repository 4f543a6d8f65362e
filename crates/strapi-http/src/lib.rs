//! strapi-http - reqwest transport for the Strapi client.
//!
//! [`HttpTransport`] implements [`strapi_core::Transport`]. Every completed
//! exchange is returned as a [`Response`] whatever its status; failures to
//! complete one map to [`Error::Connection`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use strapi_core::error::{InvalidInputError, TransportError};
use strapi_core::{ApiVersion, BearerToken, Error, Response, Result, StrapiConfig, Transport, UploadFile};

/// Header asking a v5 server for v4-shaped responses.
pub const RESPONSE_FORMAT_HEADER: &str = "strapi-response-format";

/// Transport settings.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Reject invalid TLS certificates.
    pub verify_ssl: bool,
    /// Send `Strapi-Response-Format: v4`.
    pub v4_response_format: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            verify_ssl: true,
            v4_response_format: false,
        }
    }
}

impl HttpOptions {
    /// Options matching a client configuration.
    pub fn from_config(config: &StrapiConfig) -> Self {
        Self {
            timeout: config.timeout(),
            verify_ssl: config.verify_ssl(),
            v4_response_format: config.compatibility_mode() && config.version() == ApiVersion::V5,
        }
    }
}

/// HTTP transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport with the given options.
    pub fn new(options: HttpOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if options.v4_response_format {
            headers.insert(
                HeaderName::from_static(RESPONSE_FORMAT_HEADER),
                HeaderValue::from_static("v4"),
            );
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("strapi-rs/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(options.timeout)
            .danger_accept_invalid_certs(!options.verify_ssl)
            .build()
            .map_err(|e| InvalidInputError::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            timeout: options.timeout,
        })
    }

    /// Build a transport for a client configuration.
    pub fn from_config(config: &StrapiConfig) -> Result<Self> {
        Self::new(HttpOptions::from_config(config))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&BearerToken>,
    ) -> Result<Response> {
        let request = match token {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        trace!(status, bytes = body.len(), "response received");
        Ok(Response::new(status, body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, token), fields(authed = token.is_some()))]
    async fn get(&self, url: &str, token: Option<&BearerToken>) -> Result<Response> {
        debug!("GET");
        self.send(self.client.get(url), token).await
    }

    #[instrument(skip(self, body, token), fields(authed = token.is_some()))]
    async fn post(&self, url: &str, body: &Value, token: Option<&BearerToken>) -> Result<Response> {
        debug!("POST");
        self.send(self.client.post(url).json(body), token).await
    }

    #[instrument(skip(self, body, token), fields(authed = token.is_some()))]
    async fn put(&self, url: &str, body: &Value, token: Option<&BearerToken>) -> Result<Response> {
        debug!("PUT");
        self.send(self.client.put(url).json(body), token).await
    }

    #[instrument(skip(self, token), fields(authed = token.is_some()))]
    async fn delete(&self, url: &str, token: Option<&BearerToken>) -> Result<Response> {
        debug!("DELETE");
        self.send(self.client.delete(url), token).await
    }

    #[instrument(skip(self, data, files, token), fields(files = files.len(), authed = token.is_some()))]
    async fn post_multipart(
        &self,
        url: &str,
        data: &Value,
        files: &[UploadFile],
        token: Option<&BearerToken>,
    ) -> Result<Response> {
        debug!("POST multipart");
        let mut form = Form::new().text("data", data.to_string());
        for file in files {
            form = form.part(file.part_name(), file_part(file)?);
        }
        self.send(self.client.post(url).multipart(form), token).await
    }
}

fn file_part(file: &UploadFile) -> Result<Part> {
    let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
    match &file.content_type {
        Some(mime) => part.mime_str(mime).map_err(|_| {
            Error::from(InvalidInputError::Other {
                message: format!("invalid content type '{mime}' for {}", file.file_name),
            })
        }),
        None => Ok(part),
    }
}

/// Map a reqwest failure to a transport error.
fn transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    let error = if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    } else if is_tls(&err) {
        TransportError::Tls {
            message: err.to_string(),
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Connection(error)
}

fn is_tls(err: &reqwest::Error) -> bool {
    let mut source: Option<&dyn std::error::Error> = Some(err);
    while let Some(current) = source {
        let text = current.to_string().to_ascii_lowercase();
        if text.contains("certificate") || text.contains("tls") {
            return true;
        }
        source = current.source();
    }
    false
}
