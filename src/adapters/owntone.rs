//! OwnTone (formerly forked-daapd) JSON API client
//!
//! Read-only library listing calls over HTTP.
//! Documentation: https://owntone.github.io/owntone-server/json-api/
//!
//! The server answers 404 for unknown ids; those map to `Ok(None)` so the
//! browse layer can report "not found" without treating it as a transport error.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::adapters::traits::LibraryApi;

const DEFAULT_PORT: u16 = 3689;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Library records
// =============================================================================

/// Accept ids sent as JSON numbers (tracks, playlists) or strings (albums, artists)
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Item container used by every OwnTone listing endpoint (paging fields ignored)
#[derive(Debug, Clone, Deserialize)]
pub struct Items<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for Items<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Track {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    pub title: Option<String>,
    pub uri: Option<String>,
    pub artwork_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Album {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    pub name: Option<String>,
    pub uri: Option<String>,
    pub artwork_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artist {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    pub name: Option<String>,
    pub uri: Option<String>,
    pub artwork_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Genre {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Playlist {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub smart_playlist: bool,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryEntry {
    #[serde(default)]
    pub path: String,
}

/// Response of `/api/library/directories`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryListing {
    #[serde(default)]
    pub directories: Vec<DirectoryEntry>,
    #[serde(default)]
    pub tracks: Items<Track>,
    #[serde(default)]
    pub playlists: Items<Playlist>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    tracks: Option<Items<Track>>,
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for one OwnTone server
#[derive(Clone)]
pub struct OwnToneClient {
    base_url: Url,
    client: Client,
}

impl OwnToneClient {
    /// Client for `http://host:port/` with the given request timeout
    pub fn new(host: &str, port: Option<u16>, timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;
        let base = format!("http://{}:{}/", host, port.unwrap_or(DEFAULT_PORT));
        Self::with_base_url(&base, client)
    }

    /// Client for an explicit base URL (used when the server sits behind a proxy)
    pub fn with_base_url(base_url: &str, client: Client) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("invalid OwnTone URL {}", base_url))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let url = self.base_url.join(path)?;

        debug!(url = %url, ?query, "OwnTone request");

        let response = self.client.get(url.clone()).query(query).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "OwnTone returned 404");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(anyhow!("OwnTone request to {} failed: {}", url, status));
        }

        let data: Value = response.json().await?;
        if data.is_null() {
            return Ok(None);
        }

        let parsed = serde_json::from_value(data)
            .with_context(|| format!("unexpected OwnTone response from {}", url))?;
        Ok(Some(parsed))
    }

    async fn get_items<T: DeserializeOwned>(&self, path: &str) -> Result<Option<Vec<T>>> {
        Ok(self
            .get_json::<Items<T>>(path, &[])
            .await?
            .map(|page| page.items))
    }

    async fn search_tracks(&self, expression: &str) -> Result<Option<Vec<Track>>> {
        let result: Option<SearchResult> = self
            .get_json(
                "api/search",
                &[("type", "tracks"), ("expression", expression)],
            )
            .await?;
        Ok(result.and_then(|r| r.tracks).map(|page| page.items))
    }
}

/// Quote a value for an OwnTone smart-playlist expression
fn quote_expression(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[async_trait]
impl LibraryApi for OwnToneClient {
    async fn get_directory(&self, path: Option<&str>) -> Result<Option<DirectoryListing>> {
        match path {
            Some(path) => {
                self.get_json("api/library/directories", &[("directory", path)])
                    .await
            }
            None => self.get_json("api/library/directories", &[]).await,
        }
    }

    async fn get_albums(&self) -> Result<Option<Vec<Album>>> {
        self.get_items("api/library/albums").await
    }

    async fn get_artists(&self) -> Result<Option<Vec<Artist>>> {
        self.get_items("api/library/artists").await
    }

    async fn get_genres(&self) -> Result<Option<Vec<Genre>>> {
        self.get_items("api/library/genres").await
    }

    async fn get_playlists(&self) -> Result<Option<Vec<Playlist>>> {
        self.get_items("api/library/playlists").await
    }

    async fn get_track(&self, id: &str) -> Result<Option<Track>> {
        self.get_json(&format!("api/library/tracks/{}", urlencoding::encode(id)), &[])
            .await
    }

    async fn get_album(&self, id: &str) -> Result<Option<Album>> {
        self.get_json(&format!("api/library/albums/{}", urlencoding::encode(id)), &[])
            .await
    }

    async fn get_artist(&self, id: &str) -> Result<Option<Artist>> {
        self.get_json(&format!("api/library/artists/{}", urlencoding::encode(id)), &[])
            .await
    }

    async fn get_album_tracks(&self, album_id: &str) -> Result<Option<Vec<Track>>> {
        self.get_items(&format!(
            "api/library/albums/{}/tracks",
            urlencoding::encode(album_id)
        ))
        .await
    }

    async fn get_artist_tracks(&self, artist_id: &str) -> Result<Option<Vec<Track>>> {
        self.search_tracks(&format!("songartistid is {}", quote_expression(artist_id)))
            .await
    }

    async fn get_genre_tracks(&self, genre: &str) -> Result<Option<Vec<Track>>> {
        self.search_tracks(&format!("genre is {}", quote_expression(genre)))
            .await
    }

    async fn get_playlist_tracks(&self, playlist_id: &str) -> Result<Option<Vec<Track>>> {
        self.get_items(&format!(
            "api/library/playlists/{}/tracks",
            urlencoding::encode(playlist_id)
        ))
        .await
    }

    /// Rooted paths (`/artwork/item/1`) stay under the base path
    fn full_url(&self, relative: &str) -> String {
        let relative = relative.trim_start_matches('/');
        self.base_url
            .join(relative)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", self.base_url, relative))
    }
}
