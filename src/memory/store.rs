//! Static JSON artifacts of one generation run.
//!
//! Directory layout:
//!   {out_dir}/daily-notes.json
//!   {out_dir}/brain-dumps.json
//!   {out_dir}/conversation-logs.json
//!   {out_dir}/extracted-documents.json
//!   {out_dir}/search-index.json
//!   {out_dir}/manifest.json
//!
//! Every run rewrites all six files wholesale.

use crate::{BrainError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::document::{MemoryCategory, MemoryDocument, MemoryManifest};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const SEARCH_INDEX_FILE: &str = "search-index.json";

/// Everything a run produces, already sorted.
#[derive(Debug, Clone)]
pub struct GeneratedIndex {
    pub categories: BTreeMap<MemoryCategory, Vec<MemoryDocument>>,
    pub manifest: MemoryManifest,
}

impl GeneratedIndex {
    /// Documents of one category, empty if none were produced.
    pub fn documents(&self, category: MemoryCategory) -> &[MemoryDocument] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Concatenation of all categories in fixed category order.
    pub fn search_index(&self) -> Vec<&MemoryDocument> {
        MemoryCategory::ALL
            .into_iter()
            .flat_map(|c| self.documents(c))
            .collect()
    }
}

/// Writes the artifacts into the output directory.
pub struct ArtifactStore {
    out_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Create the output directory. Failure here aborts the run.
    pub async fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.out_dir)
            .await
            .map_err(|source| BrainError::OutputDir {
                path: self.out_dir.clone(),
                source,
            })
    }

    /// Write all six artifacts concurrently.
    pub async fn write_all(&self, index: &GeneratedIndex) -> Result<()> {
        self.prepare().await?;

        let mut files: Vec<(String, String)> = Vec::with_capacity(6);
        for category in MemoryCategory::ALL {
            files.push((category.artifact_name(), to_json(index.documents(category))?));
        }
        files.push((SEARCH_INDEX_FILE.to_string(), to_json(&index.search_index())?));
        files.push((MANIFEST_FILE.to_string(), to_json(&index.manifest)?));

        let writes = files
            .iter()
            .map(|(name, content)| self.write_file(name, content));
        for result in futures::future::join_all(writes).await {
            result?;
        }
        Ok(())
    }

    async fn write_file(&self, name: &str, content: &str) -> Result<()> {
        let path = self.out_dir.join(name);
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        debug!("Wrote {:?} ({} bytes)", path, content.len());
        Ok(())
    }
}

/// Pretty JSON with 2-space indentation.
fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
