//! HTTP transport trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::{BearerToken, Error, Result};

/// A completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text.
    pub body: String,
}

impl Response {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Return `self` for a 2xx status, or the matching error for `url`.
    pub fn error_for_status(self, url: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::from_status(url, self.status, self.body))
        }
    }
}

/// A file part of a multipart upload.
#[derive(Clone)]
pub struct UploadFile {
    /// Target field on the entry; `None` sends a plain `files` part.
    pub field: Option<String>,
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type, guessed by the server when absent.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Create an upload part not bound to a field.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            field: None,
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    /// Bind the file to an entry field.
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Multipart part name: `files` or `files.<field>`.
    pub fn part_name(&self) -> String {
        match &self.field {
            Some(field) => format!("files.{field}"),
            None => "files".to_string(),
        }
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Sends HTTP requests to a Strapi instance.
///
/// Implementations return `Ok` for every completed exchange whatever its
/// status, and [`Error::Connection`] when no response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET url`.
    async fn get(&self, url: &str, token: Option<&BearerToken>) -> Result<Response>;

    /// `POST url` with a JSON body.
    async fn post(&self, url: &str, body: &Value, token: Option<&BearerToken>) -> Result<Response>;

    /// `PUT url` with a JSON body.
    async fn put(&self, url: &str, body: &Value, token: Option<&BearerToken>) -> Result<Response>;

    /// `DELETE url`.
    async fn delete(&self, url: &str, token: Option<&BearerToken>) -> Result<Response>;

    /// `POST url` as `multipart/form-data`: a `data` part holding `data`
    /// serialized as JSON, plus one part per file.
    async fn post_multipart(
        &self,
        url: &str,
        data: &Value,
        files: &[UploadFile],
        token: Option<&BearerToken>,
    ) -> Result<Response>;
}
