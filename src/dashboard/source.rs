//! Where the dashboard reads its artifacts from.
//!
//! A deployed site keeps its artifacts in `data/` next to the page, so the
//! dashboard only ever asks for `data/manifest.json` and
//! `data/search-index.json` relative to the deployment base. The four
//! per-category files are never read here.

use std::path::{Path, PathBuf};

use reqwest::{Client, Url};
use tokio::fs;
use tracing::debug;

use crate::memory::{MemoryDocument, MemoryManifest, MANIFEST_FILE, SEARCH_INDEX_FILE};
use crate::{BrainError, Result};

/// Data directory below a deployment base
pub const DATA_DIR: &str = "data";

/// A directory or an http(s) location holding `manifest.json` and
/// `search-index.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Directory(PathBuf),
    Remote(Url),
}

/// The two artifacts the dashboard consumes
#[derive(Debug, Clone)]
pub struct LoadedIndex {
    pub manifest: MemoryManifest,
    pub documents: Vec<MemoryDocument>,
}

impl DataSource {
    /// Artifacts live directly at `location` (a directory path or URL).
    pub fn parse(location: &str) -> Result<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let url = Url::parse(&with_trailing_slash(location))
                .map_err(|e| BrainError::Config(format!("invalid data URL {location}: {e}")))?;
            Ok(DataSource::Remote(url))
        } else {
            Ok(DataSource::Directory(PathBuf::from(location)))
        }
    }

    /// Artifacts live in `data/` under the deployment base `site`.
    pub fn for_site(site: &str) -> Result<Self> {
        match Self::parse(site)? {
            DataSource::Directory(dir) => Ok(DataSource::Directory(dir.join(DATA_DIR))),
            DataSource::Remote(base) => base
                .join(&format!("{DATA_DIR}/"))
                .map(DataSource::Remote)
                .map_err(|e| BrainError::Config(format!("invalid site URL {site}: {e}"))),
        }
    }

    pub fn directory(dir: impl AsRef<Path>) -> Self {
        DataSource::Directory(dir.as_ref().to_path_buf())
    }

    /// Display form of an artifact location
    pub fn locate(&self, name: &str) -> String {
        match self {
            DataSource::Directory(dir) => dir.join(name).display().to_string(),
            DataSource::Remote(base) => base
                .join(name)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| format!("{base}{name}")),
        }
    }

    async fn fetch_text(&self, client: &Client, name: &str) -> Result<String> {
        match self {
            DataSource::Directory(dir) => Ok(fs::read_to_string(dir.join(name)).await?),
            DataSource::Remote(base) => {
                let url = base
                    .join(name)
                    .map_err(|e| BrainError::Fetch(format!("{name}: {e}")))?;
                debug!("Fetching {}", url);
                let response = client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| BrainError::Fetch(format!("{url}: {e}")))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(BrainError::Fetch(format!("{url}: HTTP {status}")));
                }
                response
                    .text()
                    .await
                    .map_err(|e| BrainError::Fetch(format!("{url}: {e}")))
            }
        }
    }
}

fn with_trailing_slash(location: &str) -> String {
    if location.ends_with('/') {
        location.to_string()
    } else {
        format!("{location}/")
    }
}

/// Fetch and parse both artifacts concurrently. No retries.
pub async fn load(source: &DataSource) -> Result<LoadedIndex> {
    let client = Client::builder()
        .user_agent(concat!("second-brain/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new());

    let (manifest_text, index_text) = tokio::try_join!(
        source.fetch_text(&client, MANIFEST_FILE),
        source.fetch_text(&client, SEARCH_INDEX_FILE),
    )?;

    let manifest: MemoryManifest = serde_json::from_str(&manifest_text)?;
    let documents: Vec<MemoryDocument> = serde_json::from_str(&index_text)?;
    Ok(LoadedIndex {
        manifest,
        documents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directory_and_url() {
        assert_eq!(
            DataSource::parse("public/data").unwrap(),
            DataSource::Directory(PathBuf::from("public/data"))
        );
        let remote = DataSource::parse("https://example.org/brain/data").unwrap();
        assert_eq!(
            remote.locate(MANIFEST_FILE),
            "https://example.org/brain/data/manifest.json"
        );
    }

    #[test]
    fn test_site_keeps_path_prefix() {
        let site = DataSource::for_site("https://user.github.io/repo").unwrap();
        assert_eq!(
            site.locate(SEARCH_INDEX_FILE),
            "https://user.github.io/repo/data/search-index.json"
        );

        let local = DataSource::for_site("public").unwrap();
        assert_eq!(local, DataSource::Directory(PathBuf::from("public").join("data")));
    }

    #[test]
    fn test_invalid_url() {
        assert!(DataSource::parse("http://").is_err());
    }
}
