//! Error taxonomy for browse and artwork requests

use thiserror::Error;

/// Errors surfaced by a single browse or artwork request.
///
/// None of these are retried; each one terminates the request that produced it.
#[derive(Error, Debug)]
pub enum BrowseError {
    /// The content-id token could not be parsed
    #[error("Invalid media content id: {0}")]
    InvalidContentId(String),

    /// The decoded reference does not resolve to any server-side record or listing
    #[error("Media not found for {media_type} / {content_id}")]
    NotFound {
        media_type: String,
        content_id: String,
    },

    /// The record exists but carries no artwork reference
    #[error("No artwork available for {media_type} {id}")]
    ArtworkUnavailable { media_type: String, id: String },

    /// The library API collaborator failed (transport, status, decoding)
    #[error("OwnTone request failed: {0}")]
    Upstream(#[from] anyhow::Error),
}

impl BrowseError {
    pub(crate) fn not_found(media_type: impl Into<String>, content_id: impl Into<String>) -> Self {
        Self::NotFound {
            media_type: media_type.into(),
            content_id: content_id.into(),
        }
    }
}
