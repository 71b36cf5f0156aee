//! Media library browse tree
//!
//! Stateless mapping from a content-id to one node of the browse tree. Each
//! child carries its own encoded content-id, so the caller drives expansion by
//! sending that id back in the next request.

pub mod artwork;
pub mod content_id;
pub mod error;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::owntone::{Album, Artist, Genre, Playlist, Track};
use crate::adapters::traits::LibraryApi;

pub use artwork::{fetch_artwork, resolve_artwork_url};
pub use content_id::{ContentId, MediaType};
pub use error::BrowseError;

/// Title used when the server record has no name
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Path prefix of the artwork proxy route (`/browse_media/{type}/{id}`)
pub const ARTWORK_PROXY_PREFIX: &str = "/browse_media";

/// Top-level categories shown at the library root, in display order
const TOP_LEVEL_LIBRARY: &[(&str, MediaType)] = &[
    ("Directories", MediaType::Directory),
    ("Albums", MediaType::Album),
    ("Artists", MediaType::Artist),
    ("Genres", MediaType::Genre),
    ("Playlists", MediaType::Playlist),
];

/// Display class of a node (icon selection in the host UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaClass {
    Directory,
    Track,
    Album,
    Artist,
    Genre,
    Playlist,
    /// Playlist whose membership is computed by the server
    SmartPlaylist,
}

/// One item of the browse tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseNode {
    pub title: String,
    pub media_class: MediaClass,
    pub media_content_type: MediaType,
    pub media_content_id: String,
    pub can_expand: bool,
    pub can_play: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// OwnTone library URI for queueing the item on the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_uri: Option<String>,
    #[serde(default)]
    pub children: Vec<BrowseNode>,
}

impl BrowseNode {
    fn container(id: &ContentId, media_class: MediaClass, children: Vec<BrowseNode>) -> Self {
        Self {
            title: id.title.clone(),
            media_class,
            media_content_type: id.media_type,
            media_content_id: id.encode(),
            can_expand: true,
            can_play: false,
            thumbnail: None,
            library_uri: None,
            children,
        }
    }
}

/// Proxy path serving the artwork of the item behind `id`.
///
/// The token is escaped once more because path extractors decode the segment.
pub fn artwork_proxy_path(id: &ContentId) -> String {
    format!(
        "{}/{}/{}",
        ARTWORK_PROXY_PREFIX,
        id.media_type,
        urlencoding::encode(&id.encode())
    )
}

fn title_or_unknown(title: Option<&str>) -> String {
    match title {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => UNKNOWN_TITLE.to_string(),
    }
}

/// Last non-empty path component: "/music/srv/Music" -> "Music"
fn directory_title(path: &str) -> String {
    title_or_unknown(path.rsplit('/').find(|part| !part.is_empty()))
}

fn has_artwork(artwork_url: &Option<String>) -> bool {
    artwork_url.as_deref().is_some_and(|url| !url.is_empty())
}

fn track_node(track: &Track) -> BrowseNode {
    let id = ContentId::new(
        title_or_unknown(track.title.as_deref()),
        MediaType::Track,
        track.id.clone(),
    );
    BrowseNode {
        title: id.title.clone(),
        media_class: MediaClass::Track,
        media_content_type: MediaType::Track,
        media_content_id: id.encode(),
        can_expand: false,
        can_play: true,
        thumbnail: has_artwork(&track.artwork_url).then(|| artwork_proxy_path(&id)),
        library_uri: Some(track.uri.clone().unwrap_or_else(|| id.library_uri())),
        children: Vec::new(),
    }
}

fn album_node(album: &Album) -> BrowseNode {
    let id = ContentId::new(
        title_or_unknown(album.name.as_deref()),
        MediaType::Album,
        album.id.clone(),
    );
    BrowseNode {
        title: id.title.clone(),
        media_class: MediaClass::Album,
        media_content_type: MediaType::Album,
        media_content_id: id.encode(),
        can_expand: true,
        can_play: true,
        thumbnail: has_artwork(&album.artwork_url).then(|| artwork_proxy_path(&id)),
        library_uri: Some(album.uri.clone().unwrap_or_else(|| id.library_uri())),
        children: Vec::new(),
    }
}

fn artist_node(artist: &Artist) -> BrowseNode {
    let id = ContentId::new(
        title_or_unknown(artist.name.as_deref()),
        MediaType::Artist,
        artist.id.clone(),
    );
    BrowseNode {
        title: id.title.clone(),
        media_class: MediaClass::Artist,
        media_content_type: MediaType::Artist,
        media_content_id: id.encode(),
        can_expand: true,
        can_play: true,
        thumbnail: has_artwork(&artist.artwork_url).then(|| artwork_proxy_path(&id)),
        library_uri: Some(artist.uri.clone().unwrap_or_else(|| id.library_uri())),
        children: Vec::new(),
    }
}

fn genre_node(name: &str) -> BrowseNode {
    let id = ContentId::new(name, MediaType::Genre, name);
    BrowseNode {
        title: id.title.clone(),
        media_class: MediaClass::Genre,
        media_content_type: MediaType::Genre,
        media_content_id: id.encode(),
        can_expand: true,
        can_play: true,
        thumbnail: None,
        library_uri: Some(id.library_uri()),
        children: Vec::new(),
    }
}

fn playlist_node(playlist: &Playlist) -> BrowseNode {
    let id = ContentId::new(
        title_or_unknown(playlist.name.as_deref()),
        MediaType::Playlist,
        playlist.id.clone(),
    );
    BrowseNode {
        title: id.title.clone(),
        media_class: if playlist.smart_playlist {
            MediaClass::SmartPlaylist
        } else {
            MediaClass::Playlist
        },
        media_content_type: MediaType::Playlist,
        media_content_id: id.encode(),
        can_expand: true,
        can_play: true,
        thumbnail: None,
        library_uri: Some(playlist.uri.clone().unwrap_or_else(|| id.library_uri())),
        children: Vec::new(),
    }
}

fn directory_node(path: &str) -> BrowseNode {
    let id = ContentId::new(directory_title(path), MediaType::Directory, path);
    BrowseNode::container(&id, MediaClass::Directory, Vec::new())
}

/// Entries without an identifier would expand to the whole category again
fn has_id(id: &str, kind: MediaType) -> bool {
    if id.is_empty() {
        debug!(media_type = %kind, "Skipping library entry without identifier");
        false
    } else {
        true
    }
}

/// Root of the library: fixed categories, no upstream call
pub fn library_root() -> BrowseNode {
    let children = TOP_LEVEL_LIBRARY
        .iter()
        .map(|(title, media_type)| {
            let id = ContentId::new(*title, *media_type, "");
            BrowseNode::container(&id, class_for(*media_type), Vec::new())
        })
        .collect();
    BrowseNode::container(&ContentId::root(), MediaClass::Directory, children)
}

fn class_for(media_type: MediaType) -> MediaClass {
    match media_type {
        MediaType::Root | MediaType::Directory => MediaClass::Directory,
        MediaType::Track => MediaClass::Track,
        MediaType::Album => MediaClass::Album,
        MediaType::Artist => MediaClass::Artist,
        MediaType::Genre => MediaClass::Genre,
        MediaType::Playlist => MediaClass::Playlist,
    }
}

/// Browse one level of the library.
///
/// `media_type` is the type the caller believes it is browsing; the decoded
/// token is authoritative and the argument is only echoed in `NotFound`.
pub async fn browse(
    api: &dyn LibraryApi,
    media_type: Option<&str>,
    content_id: Option<&str>,
) -> Result<BrowseNode, BrowseError> {
    let Some(id) = ContentId::decode(content_id)? else {
        return Ok(library_root());
    };

    if let Some(requested) = media_type {
        if requested != id.media_type.as_str() {
            debug!(
                requested,
                decoded = %id.media_type,
                "Browse media type differs from content id, using content id"
            );
        }
    }

    let not_found = || {
        BrowseError::not_found(
            media_type.unwrap_or(id.media_type.as_str()),
            content_id.unwrap_or_default(),
        )
    };

    debug!(media_type = %id.media_type, id = %id.id_or_path, "Browsing library");

    match id.media_type {
        MediaType::Root => Ok(library_root()),

        MediaType::Directory => {
            let listing = api.get_directory(id.id()).await?.ok_or_else(not_found)?;
            let children = listing
                .directories
                .iter()
                .filter(|d| has_id(&d.path, MediaType::Directory))
                .map(|d| directory_node(&d.path))
                .chain(listing.tracks.items.iter().map(track_node))
                .chain(
                    listing
                        .playlists
                        .items
                        .iter()
                        .filter(|p| has_id(&p.id, MediaType::Playlist))
                        .map(playlist_node),
                )
                .collect();
            Ok(BrowseNode::container(&id, MediaClass::Directory, children))
        }

        MediaType::Album => match id.id() {
            None => {
                let albums = non_empty(api.get_albums().await?).ok_or_else(not_found)?;
                let children = albums
                    .iter()
                    .filter(|a| has_id(&a.id, MediaType::Album))
                    .map(album_node)
                    .collect();
                Ok(BrowseNode::container(&id, MediaClass::Album, children))
            }
            Some(album_id) => {
                let tracks = api.get_album_tracks(album_id).await?.ok_or_else(not_found)?;
                Ok(track_container(&id, MediaClass::Album, &tracks))
            }
        },

        MediaType::Artist => match id.id() {
            None => {
                let artists = non_empty(api.get_artists().await?).ok_or_else(not_found)?;
                let children = artists
                    .iter()
                    .filter(|a| has_id(&a.id, MediaType::Artist))
                    .map(artist_node)
                    .collect();
                Ok(BrowseNode::container(&id, MediaClass::Artist, children))
            }
            Some(artist_id) => {
                let tracks = api
                    .get_artist_tracks(artist_id)
                    .await?
                    .ok_or_else(not_found)?;
                Ok(track_container(&id, MediaClass::Artist, &tracks))
            }
        },

        MediaType::Genre => match id.id() {
            None => {
                let genres = non_empty(api.get_genres().await?).ok_or_else(not_found)?;
                let children = genres
                    .iter()
                    .filter_map(|g: &Genre| g.name.as_deref())
                    .filter(|name| has_id(name, MediaType::Genre))
                    .map(genre_node)
                    .collect();
                Ok(BrowseNode::container(&id, MediaClass::Genre, children))
            }
            Some(genre) => {
                let tracks = api.get_genre_tracks(genre).await?.ok_or_else(not_found)?;
                Ok(track_container(&id, MediaClass::Genre, &tracks))
            }
        },

        MediaType::Playlist => match id.id() {
            None => {
                let playlists = non_empty(api.get_playlists().await?).ok_or_else(not_found)?;
                let children = playlists
                    .iter()
                    .filter(|p| has_id(&p.id, MediaType::Playlist))
                    .map(playlist_node)
                    .collect();
                Ok(BrowseNode::container(&id, MediaClass::Playlist, children))
            }
            Some(playlist_id) => {
                let tracks = api
                    .get_playlist_tracks(playlist_id)
                    .await?
                    .ok_or_else(not_found)?;
                Ok(track_container(&id, MediaClass::Playlist, &tracks))
            }
        },

        MediaType::Track => {
            let track_id = id.id().ok_or_else(not_found)?;
            let track = api.get_track(track_id).await?.ok_or_else(not_found)?;
            Ok(track_node(&track))
        }
    }
}

/// Named category listings treat an empty result like a missing one
fn non_empty<T>(items: Option<Vec<T>>) -> Option<Vec<T>> {
    items.filter(|items| !items.is_empty())
}

fn track_container(id: &ContentId, media_class: MediaClass, tracks: &[Track]) -> BrowseNode {
    let mut node = BrowseNode::container(id, media_class, tracks.iter().map(track_node).collect());
    node.can_play = true;
    node.library_uri = Some(id.library_uri());
    node
}

#[cfg(test)]
pub(crate) mod test_library;
