//! OwnTone Bridge
//!
//! Library browsing and artwork proxy for OwnTone (forked-daapd) media servers.
//!
//! This library provides:
//! - A self-describing media content-id codec
//! - A stateless browse tree over directories, albums, artists, genres and playlists
//! - Artwork URL resolution and an image proxy
//! - An OwnTone JSON API client
//! - HTTP handlers exposing all of the above

pub mod adapters;
pub mod api;
pub mod browse;
pub mod config;
