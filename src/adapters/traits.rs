use anyhow::Result;
use async_trait::async_trait;

use crate::adapters::owntone::{Album, Artist, DirectoryListing, Genre, Playlist, Track};

// =============================================================================
// LibraryApi - read-only view of the media server library
// =============================================================================

/// Read-only listing calls against the media server library.
///
/// `Ok(None)` means the server had no data for the request (null body or 404).
/// `Err` is reserved for transport and decoding failures.
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// Directory listing rooted at `path`, or the top-level listing when `None`
    async fn get_directory(&self, path: Option<&str>) -> Result<Option<DirectoryListing>>;

    async fn get_albums(&self) -> Result<Option<Vec<Album>>>;

    async fn get_artists(&self) -> Result<Option<Vec<Artist>>>;

    async fn get_genres(&self) -> Result<Option<Vec<Genre>>>;

    async fn get_playlists(&self) -> Result<Option<Vec<Playlist>>>;

    async fn get_track(&self, id: &str) -> Result<Option<Track>>;

    async fn get_album(&self, id: &str) -> Result<Option<Album>>;

    async fn get_artist(&self, id: &str) -> Result<Option<Artist>>;

    async fn get_album_tracks(&self, album_id: &str) -> Result<Option<Vec<Track>>>;

    async fn get_artist_tracks(&self, artist_id: &str) -> Result<Option<Vec<Track>>>;

    /// Genres have no server id; they are addressed by name
    async fn get_genre_tracks(&self, genre: &str) -> Result<Option<Vec<Track>>>;

    async fn get_playlist_tracks(&self, playlist_id: &str) -> Result<Option<Vec<Track>>>;

    /// Join a server-relative path (e.g. an `artwork_url`) onto the server base URL
    fn full_url(&self, relative: &str) -> String;
}

// =============================================================================
// ImageFetcher - byte fetching for artwork
// =============================================================================

/// Fetched image payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Fetches image bytes and negotiates their content type
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedImage>;
}
