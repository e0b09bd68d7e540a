pub mod cloudinary;

pub use cloudinary::{CloudinaryClient, SignatureAlgorithm};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// A file received from a client, held in memory until it is handed to the
/// media host.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub url: String,
    pub public_id: String,
}

/// Remote image storage.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<UploadedMedia>;

    async fn delete(&self, public_id: &str) -> Result<()>;
}

/// Storage id of a hosted asset: the last path segment of its URL, cut at the
/// first `.`.
pub fn public_id_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.rsplit('/').next()?;
    let id = last.split('.').next()?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
