//! Picstash Utils
//!
//! Pure helpers shared by the store and the API: hashtag extraction and
//! password digests. Nothing in here touches the network or the filesystem.

pub mod password;
pub mod tags;

pub use password::hash_password;
pub use tags::{extract_tags, normalize};
