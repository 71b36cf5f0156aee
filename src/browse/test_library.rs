//! Scripted in-memory library for browse and artwork tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::adapters::owntone::{Album, Artist, DirectoryListing, Genre, Playlist, Track};
use crate::adapters::traits::{FetchedImage, ImageFetcher, LibraryApi};

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("fixture should deserialize")
}

/// `LibraryApi` fake driven by JSON fixtures.
///
/// Directory listings are consumed in order, one per call; running out is an
/// error so tests notice unexpected extra calls.
#[derive(Default)]
pub struct FakeLibrary {
    directories: Mutex<VecDeque<Option<DirectoryListing>>>,
    albums: Option<Vec<Album>>,
    artists: Option<Vec<Artist>>,
    genres: Option<Vec<Genre>>,
    playlists: Option<Vec<Playlist>>,
    tracks_by_id: HashMap<String, Track>,
    albums_by_id: HashMap<String, Album>,
    artists_by_id: HashMap<String, Artist>,
    album_tracks: HashMap<String, Vec<Track>>,
    artist_tracks: HashMap<String, Vec<Track>>,
    genre_tracks: HashMap<String, Vec<Track>>,
    playlist_tracks: HashMap<String, Vec<Track>>,
    calls: Mutex<Vec<String>>,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a directory listing (`Value::Null` scripts a missing listing)
    pub fn with_directory(self, listing: Value) -> Self {
        let listing = if listing.is_null() {
            None
        } else {
            Some(parse(listing))
        };
        self.directories
            .lock()
            .expect("directories lock")
            .push_back(listing);
        self
    }

    pub fn with_albums(mut self, albums: Value) -> Self {
        self.albums = Some(parse(albums));
        self
    }

    pub fn with_artists(mut self, artists: Value) -> Self {
        self.artists = Some(parse(artists));
        self
    }

    pub fn with_genres(mut self, genres: Value) -> Self {
        self.genres = Some(parse(genres));
        self
    }

    pub fn with_playlists(mut self, playlists: Value) -> Self {
        self.playlists = Some(parse(playlists));
        self
    }

    pub fn with_track(self, track: Value) -> Self {
        let parsed: Track = parse(track.clone());
        let id = parsed.id.clone();
        self.with_track_at(&id, track)
    }

    /// Register a track record under an explicit id (record may lack its own id)
    pub fn with_track_at(mut self, id: &str, track: Value) -> Self {
        self.tracks_by_id.insert(id.to_string(), parse(track));
        self
    }

    pub fn with_album(mut self, album: Value) -> Self {
        let album: Album = parse(album);
        self.albums_by_id.insert(album.id.clone(), album);
        self
    }

    pub fn with_artist(mut self, artist: Value) -> Self {
        let artist: Artist = parse(artist);
        self.artists_by_id.insert(artist.id.clone(), artist);
        self
    }

    pub fn with_album_tracks(mut self, id: &str, tracks: Value) -> Self {
        self.album_tracks.insert(id.to_string(), parse(tracks));
        self
    }

    pub fn with_artist_tracks(mut self, id: &str, tracks: Value) -> Self {
        self.artist_tracks.insert(id.to_string(), parse(tracks));
        self
    }

    pub fn with_genre_tracks(mut self, genre: &str, tracks: Value) -> Self {
        self.genre_tracks.insert(genre.to_string(), parse(tracks));
        self
    }

    pub fn with_playlist_tracks(mut self, id: &str, tracks: Value) -> Self {
        self.playlist_tracks.insert(id.to_string(), parse(tracks));
        self
    }

    /// Calls made so far, as `name(arg)`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(&format!("{}(", name)))
            .count()
    }

    fn record(&self, name: &str, arg: &str) {
        self.calls
            .lock()
            .expect("calls lock")
            .push(format!("{}({})", name, arg));
    }
}

#[async_trait]
impl LibraryApi for FakeLibrary {
    async fn get_directory(&self, path: Option<&str>) -> Result<Option<DirectoryListing>> {
        self.record("get_directory", path.unwrap_or(""));
        self.directories
            .lock()
            .expect("directories lock")
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted directory listing left for {:?}", path))
    }

    async fn get_albums(&self) -> Result<Option<Vec<Album>>> {
        self.record("get_albums", "");
        Ok(self.albums.clone())
    }

    async fn get_artists(&self) -> Result<Option<Vec<Artist>>> {
        self.record("get_artists", "");
        Ok(self.artists.clone())
    }

    async fn get_genres(&self) -> Result<Option<Vec<Genre>>> {
        self.record("get_genres", "");
        Ok(self.genres.clone())
    }

    async fn get_playlists(&self) -> Result<Option<Vec<Playlist>>> {
        self.record("get_playlists", "");
        Ok(self.playlists.clone())
    }

    async fn get_track(&self, id: &str) -> Result<Option<Track>> {
        self.record("get_track", id);
        Ok(self.tracks_by_id.get(id).cloned())
    }

    async fn get_album(&self, id: &str) -> Result<Option<Album>> {
        self.record("get_album", id);
        Ok(self.albums_by_id.get(id).cloned())
    }

    async fn get_artist(&self, id: &str) -> Result<Option<Artist>> {
        self.record("get_artist", id);
        Ok(self.artists_by_id.get(id).cloned())
    }

    async fn get_album_tracks(&self, album_id: &str) -> Result<Option<Vec<Track>>> {
        self.record("get_album_tracks", album_id);
        Ok(self.album_tracks.get(album_id).cloned())
    }

    async fn get_artist_tracks(&self, artist_id: &str) -> Result<Option<Vec<Track>>> {
        self.record("get_artist_tracks", artist_id);
        Ok(self.artist_tracks.get(artist_id).cloned())
    }

    async fn get_genre_tracks(&self, genre: &str) -> Result<Option<Vec<Track>>> {
        self.record("get_genre_tracks", genre);
        Ok(self.genre_tracks.get(genre).cloned())
    }

    async fn get_playlist_tracks(&self, playlist_id: &str) -> Result<Option<Vec<Track>>> {
        self.record("get_playlist_tracks", playlist_id);
        Ok(self.playlist_tracks.get(playlist_id).cloned())
    }

    fn full_url(&self, relative: &str) -> String {
        format!("http://owntone_instance/{}", relative)
    }
}

/// `ImageFetcher` fake returning fixed bytes and recording requested URLs
pub struct FakeImageFetcher {
    image: FetchedImage,
    requested: Mutex<Vec<String>>,
}

impl FakeImageFetcher {
    pub fn new(bytes: &[u8], content_type: &str) -> Self {
        Self {
            image: FetchedImage {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().expect("requested lock").clone()
    }
}

#[async_trait]
impl ImageFetcher for FakeImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        self.requested
            .lock()
            .expect("requested lock")
            .push(url.to_string());
        Ok(self.image.clone())
    }
}
