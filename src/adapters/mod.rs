//! Media server collaborators (OwnTone JSON API client, artwork fetching)

pub mod image_fetch;
pub mod owntone;
pub mod traits;

pub use image_fetch::HttpImageFetcher;
pub use owntone::OwnToneClient;
pub use traits::{FetchedImage, ImageFetcher, LibraryApi};
