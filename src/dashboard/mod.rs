//! Dashboard state: loaded artifacts, the current query and category filter,
//! and the derived result list.
//!
//! Everything here is presentation-agnostic; the terminal UI and the plain
//! printer both render from a [`DashboardState`].

mod source;

pub use source::{load, DataSource, LoadedIndex, DATA_DIR};

use std::fmt;
use std::str::FromStr;

use crate::memory::{MemoryCategory, MemoryDocument, MemoryManifest, VIEWPORT_TARGET};
use crate::search::{FuzzyIndex, SearchOptions};
use crate::Result;

/// Chars of context kept before a snippet hit
const SNIPPET_BEFORE: usize = 90;
/// Chars of context kept after the start of a snippet hit
const SNIPPET_AFTER: usize = 210;
const ELLIPSIS: &str = "…";

/// Which documents a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(MemoryCategory),
}

impl CategoryFilter {
    /// Chip order: "All" first, then the fixed category order
    pub const CHIPS: [CategoryFilter; 5] = [
        CategoryFilter::All,
        CategoryFilter::Only(MemoryCategory::DailyNotes),
        CategoryFilter::Only(MemoryCategory::BrainDumps),
        CategoryFilter::Only(MemoryCategory::ConversationLogs),
        CategoryFilter::Only(MemoryCategory::ExtractedDocuments),
    ];

    pub fn admits(self, category: MemoryCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => c == category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(c) => c.label(),
        }
    }

    fn position(self) -> usize {
        Self::CHIPS.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Next chip, wrapping around
    pub fn next(self) -> Self {
        Self::CHIPS[(self.position() + 1) % Self::CHIPS.len()]
    }

    /// Previous chip, wrapping around
    pub fn prev(self) -> Self {
        let len = Self::CHIPS.len();
        Self::CHIPS[(self.position() + len - 1) % len]
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => write!(f, "{}", c),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<MemoryCategory>().map(CategoryFilter::Only)
    }
}

/// Positions in `documents` that survive `filter`, ranked by `query` if it
/// is non-blank.
///
/// A blank query keeps the input order. Otherwise the order is relevance
/// with ties in input order. An empty input always gives an empty result.
pub fn filter_indices(
    documents: &[MemoryDocument],
    filter: CategoryFilter,
    query: &str,
) -> Vec<usize> {
    let narrowed: Vec<usize> = documents
        .iter()
        .enumerate()
        .filter(|(_, doc)| filter.admits(doc.category))
        .map(|(i, _)| i)
        .collect();

    if query.trim().is_empty() || narrowed.is_empty() {
        return narrowed;
    }

    FuzzyIndex::new(narrowed.iter().map(|&i| &documents[i]), SearchOptions::default())
        .search(query)
        .into_iter()
        .map(|hit| narrowed[hit.index])
        .collect()
}

/// [`filter_indices`], resolved to the documents themselves
pub fn filter_documents<'a>(
    documents: &'a [MemoryDocument],
    filter: CategoryFilter,
    query: &str,
) -> Vec<&'a MemoryDocument> {
    filter_indices(documents, filter, query)
        .into_iter()
        .map(|i| &documents[i])
        .collect()
}

/// Content window around the first case-insensitive occurrence of `query`,
/// or the summary when the query is blank or does not occur literally.
pub fn snippet(doc: &MemoryDocument, query: &str) -> String {
    if query.trim().is_empty() {
        return doc.summary.clone();
    }
    let needle: Vec<char> = query.chars().collect();

    let content: Vec<char> = doc.content.chars().collect();
    let Some(hit) = find_ignore_case(&content, &needle) else {
        return doc.summary.clone();
    };

    let start = hit.saturating_sub(SNIPPET_BEFORE);
    let end = (hit + SNIPPET_AFTER).min(content.len());
    let window: String = content[start..end].iter().collect();

    let mut out = String::new();
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.push_str(window.trim());
    if end < content.len() {
        out.push_str(ELLIPSIS);
    }
    out
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn find_ignore_case(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&i| {
        haystack[i..i + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| chars_eq_ignore_case(*a, *b))
    })
}

/// Everything a dashboard view renders from.
///
/// The result list is kept as positions into the loaded documents and only
/// recomputed when the documents, query or filter change.
#[derive(Debug, Clone)]
pub struct DashboardState {
    documents: Vec<MemoryDocument>,
    pub manifest: Option<MemoryManifest>,
    query: String,
    filter: CategoryFilter,
    /// Cached `filter_indices` over `documents`
    matches: Vec<usize>,
    /// True until the first load attempt settles
    pub loading: bool,
    /// Why the last load failed, if it did
    pub load_error: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            manifest: None,
            query: String::new(),
            filter: CategoryFilter::All,
            matches: Vec::new(),
            loading: true,
            load_error: None,
        }
    }

    /// Settle the load. Any failure leaves an empty, non-loading dashboard.
    pub fn apply_loaded(&mut self, result: Result<LoadedIndex>) {
        match result {
            Ok(loaded) => {
                self.manifest = Some(loaded.manifest);
                self.documents = loaded.documents;
                self.load_error = None;
            }
            Err(e) => {
                self.manifest = None;
                self.documents = Vec::new();
                self.load_error = Some(e.to_string());
            }
        }
        self.loading = false;
        self.refresh();
    }

    pub fn documents(&self) -> &[MemoryDocument] {
        &self.documents
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    /// Returns false when the query is unchanged and nothing was recomputed.
    pub fn set_query(&mut self, query: &str) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query.to_string();
        self.refresh();
        true
    }

    /// Returns false when the filter is unchanged and nothing was recomputed.
    pub fn set_filter(&mut self, filter: CategoryFilter) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        self.refresh();
        true
    }

    fn refresh(&mut self) {
        self.matches = filter_indices(&self.documents, self.filter, &self.query);
    }

    /// Current result list, read from the cache
    pub fn results(&self) -> Vec<&MemoryDocument> {
        self.matches.iter().map(|&i| &self.documents[i]).collect()
    }

    pub fn result_count(&self) -> usize {
        self.matches.len()
    }

    /// Chip label and count for every filter, in chip order.
    ///
    /// "All" counts the loaded documents; the categories use the manifest.
    pub fn chip_counts(&self) -> Vec<(CategoryFilter, usize)> {
        CategoryFilter::CHIPS
            .into_iter()
            .map(|filter| {
                let count = match filter {
                    CategoryFilter::All => self.documents.len(),
                    CategoryFilter::Only(c) => {
                        self.manifest.as_ref().map(|m| m.count(c)).unwrap_or(0)
                    }
                };
                (filter, count)
            })
            .collect()
    }

    /// Manifest total, or the loaded count without a manifest
    pub fn total_documents(&self) -> usize {
        self.manifest
            .as_ref()
            .map(|m| m.total_documents)
            .unwrap_or(self.documents.len())
    }

    pub fn viewport_target(&self) -> &str {
        self.manifest
            .as_ref()
            .map(|m| m.viewport_target.as_str())
            .unwrap_or(VIEWPORT_TARGET)
    }
}
