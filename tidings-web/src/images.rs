//! Thumbnail download into the output directory.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tidings_core::traits::ImageFetch;
use tidings_http::{HttpClient, RequestOpts};
use tracing::debug;
use uuid::Uuid;

/// [`ImageFetch`] over [`HttpClient`]. Every download gets a fresh
/// `<uuid-v4>.jpg` name so repeated thumbnails never collide.
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: HttpClient,
}

impl HttpImageFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetch for HttpImageFetcher {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<String> {
        if url.is_empty() {
            return Ok(String::new());
        }

        let bytes = self
            .client
            .get_bytes(url, RequestOpts::default())
            .await
            .with_context(|| format!("downloading {url}"))?;

        tokio::fs::create_dir_all(dest_dir)
            .await
            .with_context(|| format!("creating {}", dest_dir.display()))?;
        let file_name = format!("{}.jpg", Uuid::new_v4());
        let path = dest_dir.join(&file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        debug!(%file_name, size = bytes.len(), "image.saved");
        Ok(file_name)
    }
}
