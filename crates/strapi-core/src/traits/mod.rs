//! Collaborator traits for network and cache access.

mod cache;
mod transport;

pub use cache::{KeyValueCache, remember};
pub use transport::{Response, Transport, UploadFile};
