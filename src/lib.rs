//! Second Brain - static memory index
//!
//! A one-shot build step plus a read-only browser:
//! - Scan note, transcript, log and extraction directories
//! - Redact likely secrets, normalize markdown, classify each file
//! - Emit static JSON artifacts (per-category arrays, search index, manifest)
//! - Browse the artifacts with category filters and fuzzy search

pub mod config;
pub mod dashboard;
pub mod memory;
pub mod pipeline;
pub mod rules;
pub mod search;
pub mod tui;

pub use dashboard::{CategoryFilter, DashboardState, DataSource};
pub use memory::{MemoryCategory, MemoryDocument, MemoryManifest};
pub use pipeline::{Pipeline, RunSummary};
pub use search::FuzzyIndex;

use std::path::{Path, PathBuf};

/// Directory names used under the workspace root when nothing else is configured
pub const DEFAULT_NOTES_DIR: &str = "memory";
pub const DEFAULT_TRANSCRIPTS_DIR: &str = "transcripts";
pub const DEFAULT_LOGS_DIR: &str = "logs";
pub const DEFAULT_EXTRACTION_DIR: &str = "extraction-results";

/// Configuration for Second Brain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrainConfig {
    /// Root that `source` paths are made relative to
    pub workspace_root: PathBuf,

    /// Daily notes and brain dumps
    pub notes_dir: PathBuf,

    /// Transcripts (brain dumps or conversations, by file name)
    pub transcripts_dir: PathBuf,

    /// Logs (always conversations)
    pub logs_dir: PathBuf,

    /// Extraction results
    pub extraction_dir: PathBuf,

    /// Where the JSON artifacts are written
    pub out_dir: PathBuf,
}

impl BrainConfig {
    pub fn new(workspace_root: PathBuf, out_dir: PathBuf) -> Self {
        Self {
            notes_dir: workspace_root.join(DEFAULT_NOTES_DIR),
            transcripts_dir: workspace_root.join(DEFAULT_TRANSCRIPTS_DIR),
            logs_dir: workspace_root.join(DEFAULT_LOGS_DIR),
            extraction_dir: workspace_root.join(DEFAULT_EXTRACTION_DIR),
            workspace_root,
            out_dir,
        }
    }

    pub fn with_notes_dir(mut self, path: PathBuf) -> Self {
        self.notes_dir = path;
        self
    }

    pub fn with_transcripts_dir(mut self, path: PathBuf) -> Self {
        self.transcripts_dir = path;
        self
    }

    pub fn with_logs_dir(mut self, path: PathBuf) -> Self {
        self.logs_dir = path;
        self
    }

    pub fn with_extraction_dir(mut self, path: PathBuf) -> Self {
        self.extraction_dir = path;
        self
    }

    pub fn with_out_dir(mut self, path: PathBuf) -> Self {
        self.out_dir = path;
        self
    }

    /// Path of `file` relative to the workspace root, for display only.
    pub fn relative_source(&self, file: &Path) -> String {
        match file.strip_prefix(&self.workspace_root) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => file.to_string_lossy().to_string(),
        }
    }
}

/// Result type for Second Brain operations
pub type Result<T> = std::result::Result<T, BrainError>;

/// Errors that can occur in Second Brain
#[derive(Debug, thiserror::Error)]
pub enum BrainError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fetch error: {0}")]
    Fetch(String),
}
