//! Markdown normalization and field derivation.
//!
//! All lengths here count chars, not bytes.

use std::sync::LazyLock;

use regex::Regex;

/// Cap on a document's stored content
pub const CONTENT_MAX_CHARS: usize = 9000;
/// Cap on a summary before the ellipsis marker
pub const SUMMARY_MAX_CHARS: usize = 220;
pub const ELLIPSIS: &str = "…";

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());
static HEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s?").unwrap());
static BLOCKQUOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*>\s?").unwrap());
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").unwrap());
static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_LINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static TOP_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").unwrap());

/// Strip markdown syntax and normalize whitespace.
///
/// Steps run in a fixed order; later steps rely on the earlier ones (the
/// whitespace collapse must see the text after markers are gone).
pub fn clean(text: &str) -> String {
    let text = FENCED_CODE.replace_all(text, " ");
    let text = text.replace('`', "");
    let text = LINK.replace_all(&text, "$1");
    let text = HEADING_MARKER.replace_all(&text, "");
    let text = BLOCKQUOTE_MARKER.replace_all(&text, "");
    let text = LIST_MARKER.replace_all(&text, "");
    let text = text.replace('\r', "");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let text = BLANK_LINE_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// First `# ` heading of `content`, else `fallback`.
pub fn title_from_content(content: &str, fallback: &str) -> String {
    TOP_HEADING
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|heading| !heading.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// First `YYYY-MM-DD` in the file name, else in the content.
pub fn infer_date(file_name: &str, content: &str) -> Option<String> {
    ISO_DATE
        .find(file_name)
        .or_else(|| ISO_DATE.find(content))
        .map(|m| m.as_str().to_string())
}

/// First `max` chars of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Single-line summary, at most `max` chars plus the ellipsis marker.
pub fn summarize(content: &str, max: usize) -> String {
    let flat = content.replace('\n', " ");
    let compact = WHITESPACE.replace_all(&flat, " ");
    let compact = compact.trim();

    if compact.chars().count() > max {
        let mut summary = truncate_chars(compact, max).trim().to_string();
        summary.push_str(ELLIPSIS);
        summary
    } else {
        compact.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_strips_markdown() {
        let raw = "# Title\r\nSome `code` and a [link](http://x.y).\n```rust\nfn main() {}\n```\n> quoted\n- item one\n* item two\n+ item three\n\n\n\n\nend   of\t\tline";
        let cleaned = clean(raw);
        assert_eq!(
            cleaned,
            "Title\nSome code and a link.\nquoted\nitem one\nitem two\nitem three\n\nend of line"
        );
    }

    #[test]
    fn test_clean_collapses_blank_runs() {
        assert_eq!(clean("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean("  \n\n  padded  \n\n"), "padded");
    }

    #[test]
    fn test_title() {
        assert_eq!(title_from_content("intro\n# Heading one \nbody", "f.md"), "Heading one");
        assert_eq!(title_from_content("## Second level only", "f.md"), "f.md");
        assert_eq!(title_from_content("no heading", "f.md"), "f.md");
    }

    #[test]
    fn test_infer_date_prefers_name() {
        assert_eq!(
            infer_date("2024-03-01.md", "written 2023-01-01"),
            Some("2024-03-01".to_string())
        );
        assert_eq!(
            infer_date("notes.md", "written 2023-01-01 and 2022-02-02"),
            Some("2023-01-01".to_string())
        );
        assert_eq!(infer_date("notes.md", "no date here"), None);
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        let long = "x".repeat(CONTENT_MAX_CHARS + 50);
        assert_eq!(truncate_chars(&long, CONTENT_MAX_CHARS).chars().count(), CONTENT_MAX_CHARS);
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize("line one\n\nline   two", SUMMARY_MAX_CHARS), "line one line two");

        let long = "word ".repeat(100);
        let summary = summarize(&long, SUMMARY_MAX_CHARS);
        assert!(summary.ends_with(ELLIPSIS));
        assert!(summary.chars().count() <= SUMMARY_MAX_CHARS + 1);

        let exact = "y".repeat(SUMMARY_MAX_CHARS);
        assert_eq!(summarize(&exact, SUMMARY_MAX_CHARS), exact);
    }
}
