//! Media content-id codec
//!
//! Every browsable node carries a self-describing token:
//!
//! ```text
//! owntone:<title>:library:<media_type>:<id_or_path>:<subtype>
//! ```
//!
//! `title`, `id_or_path` and `subtype` are percent-encoded so that `:` and `/`
//! inside them never collide with the separators. The middle section
//! (`library:<media_type>:<id_or_path>`) is the OwnTone library URI of the item.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::BrowseError;

/// Leading schema field of every token
pub const URI_SCHEMA: &str = "owntone";

/// OwnTone library URI prefix
const LIBRARY_PREFIX: &str = "library";

/// Number of `:`-separated fields in an encoded token
const FIELD_COUNT: usize = 6;

/// Media categories understood by the browse tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Root,
    Directory,
    Track,
    Album,
    Artist,
    Genre,
    Playlist,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Directory => "directory",
            Self::Track => "track",
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Genre => "genre",
            Self::Playlist => "playlist",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = BrowseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root" => Ok(Self::Root),
            "directory" => Ok(Self::Directory),
            "track" => Ok(Self::Track),
            "album" => Ok(Self::Album),
            "artist" => Ok(Self::Artist),
            "genre" => Ok(Self::Genre),
            "playlist" => Ok(Self::Playlist),
            other => Err(BrowseError::InvalidContentId(format!(
                "unknown media type '{}'",
                other
            ))),
        }
    }
}

/// Decoded form of a media content-id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentId {
    pub title: String,
    pub media_type: MediaType,
    /// Server-assigned id, genre name, or directory path. Empty means "all".
    pub id_or_path: String,
    pub subtype: String,
}

impl ContentId {
    pub fn new(
        title: impl Into<String>,
        media_type: MediaType,
        id_or_path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            media_type,
            id_or_path: id_or_path.into(),
            subtype: String::new(),
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = subtype.into();
        self
    }

    /// Token for the root of the library
    pub fn root() -> Self {
        Self::new("OwnTone Library", MediaType::Root, "")
    }

    /// Identifier if one is present
    pub fn id(&self) -> Option<&str> {
        if self.id_or_path.is_empty() {
            None
        } else {
            Some(&self.id_or_path)
        }
    }

    /// OwnTone library URI (`library:<type>:<id>`) embedded in the token
    pub fn library_uri(&self) -> String {
        format!(
            "{}:{}:{}",
            LIBRARY_PREFIX,
            self.media_type,
            urlencoding::encode(&self.id_or_path)
        )
    }

    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            URI_SCHEMA,
            urlencoding::encode(&self.title),
            self.library_uri(),
            urlencoding::encode(&self.subtype)
        )
    }

    /// Decode a token. An absent or blank token means the library root.
    pub fn decode(token: Option<&str>) -> Result<Option<Self>, BrowseError> {
        match token.map(str::trim) {
            None | Some("") => Ok(None),
            Some(token) => token.parse().map(Some),
        }
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for ContentId {
    type Err = BrowseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = token.split(':').collect();
        if parts.len() != FIELD_COUNT {
            return Err(BrowseError::InvalidContentId(format!(
                "expected {} fields, got {}: {}",
                FIELD_COUNT,
                parts.len(),
                token
            )));
        }
        if parts[0] != URI_SCHEMA || parts[2] != LIBRARY_PREFIX {
            return Err(BrowseError::InvalidContentId(format!(
                "unrecognised schema: {}",
                token
            )));
        }

        Ok(Self {
            title: unquote(parts[1])?,
            media_type: parts[3].parse()?,
            id_or_path: unquote(parts[4])?,
            subtype: unquote(parts[5])?,
        })
    }
}

fn unquote(field: &str) -> Result<String, BrowseError> {
    urlencoding::decode(field)
        .map(|s| s.into_owned())
        .map_err(|e| BrowseError::InvalidContentId(format!("bad escape in '{}': {}", field, e)))
}
