//! Media library.

use std::fmt;

use serde_json::Value;
use tracing::{debug, instrument};

use strapi_core::Result;

use crate::client::{Strapi, write_outcome};

/// Operations on files in the Strapi media library.
#[derive(Debug, Clone)]
pub struct Uploads {
    client: Strapi,
}

impl Uploads {
    pub(crate) fn new(client: Strapi) -> Self {
        Self { client }
    }

    /// Endpoint of the uploaded file `id`: `<url>/upload/files/<id>`.
    pub fn file_url(&self, id: impl fmt::Display) -> String {
        self.client
            .config()
            .url()
            .join(&format!("upload/files/{id}"))
    }

    /// Delete the uploaded file `id`, returning the deleted file's record.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: impl fmt::Display + fmt::Debug) -> Result<Value> {
        let url = self.file_url(&id);
        let token = self.client.bearer().await?;
        debug!(%url, auth = self.client.config().auth().name(), "DELETE request");

        let response = self.client.transport().delete(&url, token.as_ref()).await?;
        write_outcome(&url, response)
    }
}
