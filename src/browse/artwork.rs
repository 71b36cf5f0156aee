//! Artwork resolution for browse nodes
//!
//! Uses the same content-id as browsing to find the record, then turns its
//! server-relative `artwork_url` into an absolute URL for the image fetcher.

use tracing::debug;

use super::content_id::{ContentId, MediaType};
use super::error::BrowseError;
use crate::adapters::traits::{FetchedImage, ImageFetcher, LibraryApi};

/// Absolute artwork URL for the album, artist or track behind `content_id`
pub async fn resolve_artwork_url(
    api: &dyn LibraryApi,
    media_type: &str,
    content_id: &str,
) -> Result<String, BrowseError> {
    let id = ContentId::decode(Some(content_id))?
        .ok_or_else(|| BrowseError::InvalidContentId("empty content id".to_string()))?;

    let unavailable = || BrowseError::ArtworkUnavailable {
        media_type: id.media_type.to_string(),
        id: id.id_or_path.clone(),
    };
    let not_found = || BrowseError::not_found(media_type, content_id);

    let Some(record_id) = id.id() else {
        return Err(unavailable());
    };

    let artwork_url = match id.media_type {
        MediaType::Album => api
            .get_album(record_id)
            .await?
            .ok_or_else(not_found)?
            .artwork_url,
        MediaType::Artist => api
            .get_artist(record_id)
            .await?
            .ok_or_else(not_found)?
            .artwork_url,
        MediaType::Track => api
            .get_track(record_id)
            .await?
            .ok_or_else(not_found)?
            .artwork_url,
        _ => None,
    };

    let artwork_url = artwork_url
        .filter(|url| !url.is_empty())
        .ok_or_else(unavailable)?;

    let url = api.full_url(&artwork_url);
    debug!(media_type = %id.media_type, id = record_id, url = %url, "Resolved artwork");
    Ok(url)
}

/// Resolve and fetch artwork bytes for `content_id`
pub async fn fetch_artwork(
    api: &dyn LibraryApi,
    fetcher: &dyn ImageFetcher,
    media_type: &str,
    content_id: &str,
) -> Result<FetchedImage, BrowseError> {
    let url = resolve_artwork_url(api, media_type, content_id).await?;
    Ok(fetcher.fetch(&url).await?)
}
