//! Memory module for Second Brain
//!
//! Document model and the static artifact store.

mod document;
mod store;

pub use document::{by_date_desc, MemoryCategory, MemoryDocument, MemoryManifest, VIEWPORT_TARGET};
pub use store::{ArtifactStore, GeneratedIndex, MANIFEST_FILE, SEARCH_INDEX_FILE};
