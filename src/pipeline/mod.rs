//! Document pipeline
//!
//! One-shot batch job: scan the four input roots, classify each file, build
//! documents (redact, clean, redact again, derive fields), sort each
//! category and write the static artifacts.
//!
//! Files within a category are built concurrently and the categories run
//! concurrently with each other. Completion order never reaches the output:
//! the sort step imposes the final order. There is no read timeout; a stuck
//! read stalls its category.

pub mod assemble;
pub mod normalize;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use futures::future::join_all;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::memory::{
    by_date_desc, ArtifactStore, GeneratedIndex, MemoryCategory, MemoryDocument, MemoryManifest,
};
use crate::rules::{Classifier, InputRoot};
use crate::{BrainConfig, Result};

use assemble::{build_document, dedupe_ids};

/// Outcome of a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub out_dir: PathBuf,
    pub counts: BTreeMap<MemoryCategory, usize>,
    pub total: usize,
    /// Files that were classified but could not be read
    pub skipped: usize,
}

/// Regular files directly inside `dir`, sorted by path.
///
/// A missing or unreadable directory yields no files.
pub async fn scan_dir(dir: &Path) -> Vec<PathBuf> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Input directory {:?} not readable, treating as empty: {}", dir, e);
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let is_file = entry
                    .file_type()
                    .await
                    .map(|t| t.is_file())
                    .unwrap_or(false);
                if is_file {
                    files.push(entry.path());
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Stopped listing {:?}: {}", dir, e);
                break;
            }
        }
    }

    files.sort();
    files
}

pub struct Pipeline {
    config: BrainConfig,
    classifier: Classifier,
}

impl Pipeline {
    pub fn new(config: BrainConfig) -> Self {
        Self {
            config,
            classifier: Classifier::new(),
        }
    }

    fn roots(&self) -> [(InputRoot, &Path); 4] {
        [
            (InputRoot::Notes, self.config.notes_dir.as_path()),
            (InputRoot::Transcripts, self.config.transcripts_dir.as_path()),
            (InputRoot::Logs, self.config.logs_dir.as_path()),
            (InputRoot::Extraction, self.config.extraction_dir.as_path()),
        ]
    }

    /// Classify every scanned input file. Unmatched files are dropped.
    pub async fn plan(&self) -> BTreeMap<MemoryCategory, Vec<PathBuf>> {
        let mut plan: BTreeMap<MemoryCategory, Vec<PathBuf>> = MemoryCategory::ALL
            .into_iter()
            .map(|c| (c, Vec::new()))
            .collect();

        for (root, dir) in self.roots() {
            for path in scan_dir(dir).await {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                match self.classifier.classify(root, &name) {
                    Some(category) => plan.entry(category).or_default().push(path),
                    None => debug!("Dropping unclassified {} file {:?}", root, path),
                }
            }
        }

        plan
    }

    async fn build_category(
        &self,
        category: MemoryCategory,
        paths: &[PathBuf],
    ) -> (Vec<MemoryDocument>, usize) {
        let results = join_all(paths.iter().map(|path| async move {
            (path, build_document(&self.config, path, category).await)
        }))
        .await;

        let mut docs = Vec::with_capacity(results.len());
        let mut skipped = 0;
        for (path, result) in results {
            match result {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    warn!("Skipping unreadable file {:?}: {}", path, e);
                    skipped += 1;
                }
            }
        }

        docs.sort_by(by_date_desc);
        (docs, skipped)
    }

    /// Build all documents and the manifest without writing anything.
    pub async fn build(&self) -> (GeneratedIndex, usize) {
        let plan = self.plan().await;
        let paths = |c: MemoryCategory| plan.get(&c).map(Vec::as_slice).unwrap_or(&[]);

        let (daily, brain, convo, extracted) = tokio::join!(
            self.build_category(MemoryCategory::DailyNotes, paths(MemoryCategory::DailyNotes)),
            self.build_category(MemoryCategory::BrainDumps, paths(MemoryCategory::BrainDumps)),
            self.build_category(
                MemoryCategory::ConversationLogs,
                paths(MemoryCategory::ConversationLogs)
            ),
            self.build_category(
                MemoryCategory::ExtractedDocuments,
                paths(MemoryCategory::ExtractedDocuments)
            ),
        );

        let skipped = daily.1 + brain.1 + convo.1 + extracted.1;
        let mut categories = BTreeMap::new();
        categories.insert(MemoryCategory::DailyNotes, daily.0);
        categories.insert(MemoryCategory::BrainDumps, brain.0);
        categories.insert(MemoryCategory::ConversationLogs, convo.0);
        categories.insert(MemoryCategory::ExtractedDocuments, extracted.0);

        // BTreeMap iterates in category order, which is the search index order
        dedupe_ids(categories.values_mut().flat_map(|docs| docs.iter_mut()));

        let counts = categories.iter().map(|(c, docs)| (*c, docs.len())).collect();
        let manifest = MemoryManifest::new(Utc::now(), counts);

        (GeneratedIndex { categories, manifest }, skipped)
    }

    /// Build and write all artifacts.
    pub async fn run(&self) -> Result<RunSummary> {
        let store = ArtifactStore::new(self.config.out_dir.clone());
        store.prepare().await?;

        info!("Generating memory index into {:?}", store.out_dir());
        let (index, skipped) = self.build().await;
        store.write_all(&index).await?;

        let summary = RunSummary {
            out_dir: store.out_dir().to_path_buf(),
            counts: index.manifest.categories.clone(),
            total: index.manifest.total_documents,
            skipped,
        };
        info!(
            "Wrote {} documents ({} skipped) to {:?}",
            summary.total, summary.skipped, summary.out_dir
        );
        Ok(summary)
    }
}
