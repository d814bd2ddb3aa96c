//! Per-file document assembly

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tokio::fs;

use super::normalize::{
    clean, infer_date, summarize, title_from_content, truncate_chars, CONTENT_MAX_CHARS,
    SUMMARY_MAX_CHARS,
};
use crate::memory::{MemoryCategory, MemoryDocument};
use crate::rules::redact_sensitive;
use crate::{BrainConfig, Result};

static NON_ALNUM_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").unwrap());

/// Read a file as text. JSON files are re-printed with 2-space indentation
/// (key order kept); if they do not parse, the raw text is used.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub async fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).await?;
    let raw = String::from_utf8_lossy(&bytes).into_owned();

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        return Ok(raw);
    }

    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) => Ok(serde_json::to_string_pretty(&value)?),
        Err(_) => Ok(raw),
    }
}

/// `<category>-<file name with non-alphanumeric runs as "-", lower-cased>`
pub fn document_id(category: MemoryCategory, file_name: &str) -> String {
    let slug = NON_ALNUM_RUN.replace_all(file_name, "-").to_lowercase();
    format!("{}-{}", category.as_str(), slug)
}

/// Make ids unique in iteration order by suffixing `-2`, `-3`, ...
pub fn dedupe_ids<'a>(docs: impl IntoIterator<Item = &'a mut MemoryDocument>) {
    let mut seen = HashSet::new();
    for doc in docs {
        if seen.insert(doc.id.clone()) {
            continue;
        }
        let mut n = 2;
        let unique = loop {
            let candidate = format!("{}-{}", doc.id, n);
            if !seen.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        seen.insert(unique.clone());
        doc.id = unique;
    }
}

/// Build the document for one classified file.
pub async fn build_document(
    config: &BrainConfig,
    path: &Path,
    category: MemoryCategory,
) -> Result<MemoryDocument> {
    let raw = read_text(path).await?;

    // Redact before and after cleaning: cleaning reshapes whitespace and
    // markup around tokens, which can expose new matches.
    let cleaned = clean(&redact_sensitive(&raw));
    let safe_text = redact_sensitive(&cleaned);

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let title = title_from_content(&safe_text, &file_name);
    let content = truncate_chars(&safe_text, CONTENT_MAX_CHARS);

    Ok(MemoryDocument {
        id: document_id(category, &file_name),
        category,
        title,
        source: config.relative_source(path),
        date: infer_date(&file_name, &cleaned),
        tags: category.tags().iter().map(|t| t.to_string()).collect(),
        summary: summarize(&content, SUMMARY_MAX_CHARS),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_document_id_is_safe() {
        assert_eq!(
            document_id(MemoryCategory::DailyNotes, "2024-01-01.md"),
            "daily-notes-2024-01-01-md"
        );
        assert_eq!(
            document_id(MemoryCategory::BrainDumps, "My Brain Dump (v2).MD"),
            "brain-dumps-my-brain-dump-v2-md"
        );
        let id = document_id(MemoryCategory::ExtractedDocuments, "naïve résumé.txt");
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'), "{}", id);
    }

    #[test]
    fn test_dedupe_ids() {
        let mut docs: Vec<MemoryDocument> = ["a", "a", "b", "a"]
            .iter()
            .map(|id| MemoryDocument {
                id: id.to_string(),
                category: MemoryCategory::BrainDumps,
                title: String::new(),
                source: String::new(),
                date: None,
                tags: Vec::new(),
                summary: String::new(),
                content: String::new(),
            })
            .collect();
        dedupe_ids(docs.iter_mut());
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a-2", "b", "a-3"]);
    }

    #[tokio::test]
    async fn test_read_text_pretty_prints_json() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&good, r#"{"z":1,"a":[true]}"#).unwrap();
        std::fs::write(&bad, "{not json").unwrap();

        assert_eq!(
            read_text(&good).await.unwrap(),
            "{\n  \"z\": 1,\n  \"a\": [\n    true\n  ]\n}"
        );
        assert_eq!(read_text(&bad).await.unwrap(), "{not json");
    }

    #[tokio::test]
    async fn test_build_document_redacts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory").join("2024-02-03.md");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "# Setup\n\napi_key: AKIA1234567890ABCDEF\n- done").unwrap();

        let config = BrainConfig::new(dir.path().to_path_buf(), PathBuf::from("/unused"));
        let doc = build_document(&config, &path, MemoryCategory::DailyNotes)
            .await
            .unwrap();

        assert_eq!(doc.id, "daily-notes-2024-02-03-md");
        assert_eq!(doc.date.as_deref(), Some("2024-02-03"));
        assert_eq!(doc.source, "memory/2024-02-03.md");
        assert_eq!(doc.tags, vec!["daily"]);
        assert!(doc.content.contains("[REDACTED]"));
        assert!(doc.summary.contains("[REDACTED]"));
        assert!(!doc.content.contains("AKIA1234567890ABCDEF"));
        assert!(!doc.summary.contains("AKIA1234567890ABCDEF"));
        assert_eq!(doc.summary, "Setup api_key: [REDACTED] done");
    }

    #[tokio::test]
    async fn test_token_joined_by_cleaning_is_redacted() {
        // Two short halves only become one long token once the backtick is gone
        let raw = format!("{}`{}", "a".repeat(16), "b".repeat(16));
        assert!(!redact_sensitive(&raw).contains(crate::rules::REDACTED));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory").join("brain-dump-keys.md");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, &raw).unwrap();

        let config = BrainConfig::new(dir.path().to_path_buf(), PathBuf::from("/unused"));
        let doc = build_document(&config, &path, MemoryCategory::BrainDumps)
            .await
            .unwrap();

        assert_eq!(doc.content, "[REDACTED]");
        assert_eq!(doc.summary, "[REDACTED]");
    }
}
