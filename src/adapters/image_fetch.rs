//! Artwork fetching over HTTP
//!
//! Content type is negotiated in order:
//! 1. `Content-Type` header, when it names an image
//! 2. Magic-byte sniffing via the `image` crate
//! 3. File extension of the URL path
//! 4. `application/octet-stream`

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use tracing::debug;

use crate::adapters::traits::{FetchedImage, ImageFetcher};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// `ImageFetcher` backed by a shared `reqwest::Client`
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        debug!(url, "Fetching artwork");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Artwork request failed: {}", response.status()));
        }

        let header = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let bytes = response.bytes().await?.to_vec();

        if bytes.is_empty() {
            return Err(anyhow!("Artwork response from {} was empty", url));
        }

        let content_type = negotiate_content_type(header.as_deref(), &bytes, url);
        debug!(url, content_type = %content_type, len = bytes.len(), "Artwork fetched");

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}

/// Pick the content type for fetched artwork bytes
pub fn negotiate_content_type(header: Option<&str>, bytes: &[u8], url: &str) -> String {
    if let Some(header) = header {
        let essence = header.split(';').next().unwrap_or("").trim();
        if essence.starts_with("image/") {
            return essence.to_string();
        }
    }

    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_string();
    }

    let path = url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string());
    mime_guess::from_path(&path)
        .first()
        .filter(|m| m.type_() == mime_guess::mime::IMAGE)
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}
