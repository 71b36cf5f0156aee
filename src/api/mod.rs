//! HTTP API handlers

use crate::adapters::traits::{ImageFetcher, LibraryApi};
use crate::browse::{self, BrowseError};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<dyn LibraryApi>,
    pub images: Arc<dyn ImageFetcher>,
    /// Base URL of the OwnTone server, reported by /status
    pub owntone_url: String,
}

impl AppState {
    pub fn new(
        library: Arc<dyn LibraryApi>,
        images: Arc<dyn ImageFetcher>,
        owntone_url: impl Into<String>,
    ) -> Self {
        Self {
            library,
            images,
            owntone_url: owntone_url.into(),
        }
    }
}

/// Build the HTTP router for the bridge
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/status", get(status_handler))
        // Library browsing
        .route("/browse", get(browse_handler))
        // Artwork proxy (thumbnails of browse nodes point here)
        .route(
            "/browse_media/{media_type}/{media_content_id}",
            get(browse_image_handler),
        )
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// General status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub git_sha: &'static str,
    pub owntone_url: String,
}

/// GET /status - Service health check
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: "owntone-bridge",
        version: env!("OTB_VERSION"),
        git_sha: env!("OTB_GIT_SHA"),
        owntone_url: state.owntone_url.clone(),
    })
}

/// Browse query parameters
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub media_content_type: Option<String>,
    pub media_content_id: Option<String>,
}

fn browse_status(err: &BrowseError) -> StatusCode {
    match err {
        BrowseError::InvalidContentId(_) => StatusCode::BAD_REQUEST,
        BrowseError::NotFound { .. } => StatusCode::NOT_FOUND,
        BrowseError::ArtworkUnavailable { .. } => StatusCode::NOT_FOUND,
        BrowseError::Upstream(_) => StatusCode::BAD_GATEWAY,
    }
}

/// GET /browse - One level of the library browse tree
pub async fn browse_handler(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Response {
    let result = browse::browse(
        state.library.as_ref(),
        query.media_content_type.as_deref(),
        query.media_content_id.as_deref(),
    )
    .await;

    match result {
        Ok(node) => (StatusCode::OK, Json(node)).into_response(),
        Err(e) => {
            tracing::warn!(
                media_content_type = ?query.media_content_type,
                media_content_id = ?query.media_content_id,
                "Browse failed: {}",
                e
            );
            (
                browse_status(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /browse_media/{media_type}/{media_content_id} - Artwork proxy
///
/// Any failure is a bare 500; no placeholder image is served.
pub async fn browse_image_handler(
    State(state): State<AppState>,
    Path((media_type, media_content_id)): Path<(String, String)>,
) -> Response {
    let result = browse::fetch_artwork(
        state.library.as_ref(),
        state.images.as_ref(),
        &media_type,
        &media_content_id,
    )
    .await;

    match result {
        Ok(image) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, image.content_type)],
            image.bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(
                media_type = %media_type,
                media_content_id = %media_content_id,
                "Artwork unavailable: {}",
                e
            );
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
