//! Mock servers for adapter integration testing
//!
//! These mock servers simulate the OwnTone JSON API so the client, browse tree
//! and HTTP handlers can be exercised without a real media server.

#![allow(dead_code)]

pub mod owntone;

pub use owntone::MockOwnToneServer;
