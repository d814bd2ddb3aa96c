//! File classification rules
//!
//! A file may satisfy several predicates (a transcript with "plan" in its
//! name is also a markdown file), so the rules form an ordered list that is
//! evaluated top to bottom and stops at the first match.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::memory::MemoryCategory;

/// Transcript names containing any of these are conversations, not brain dumps
pub const CONVERSATION_KEYWORDS: [&str; 7] = [
    "meeting",
    "action",
    "analysis",
    "batch",
    "remaining",
    "plan",
    "team",
];

/// Extensions accepted from the extraction root
pub const EXTRACTED_EXTENSIONS: [&str; 4] = ["json", "csv", "md", "txt"];

/// Markdown names ending in a date, e.g. `2024-01-01.md` or `journal-2024-01-01.md`
static DAILY_NOTE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9]{4}-[0-9]{2}-[0-9]{2}\.md$").unwrap());

/// The input directory a file was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputRoot {
    Notes,
    Transcripts,
    Logs,
    Extraction,
}

impl std::fmt::Display for InputRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputRoot::Notes => write!(f, "notes"),
            InputRoot::Transcripts => write!(f, "transcripts"),
            InputRoot::Logs => write!(f, "logs"),
            InputRoot::Extraction => write!(f, "extraction"),
        }
    }
}

/// One entry of the ordered rule list
#[derive(Clone)]
pub struct ClassificationRule {
    pub name: &'static str,
    pub root: InputRoot,
    pub category: MemoryCategory,
    predicate: fn(&str) -> bool,
}

impl ClassificationRule {
    pub fn matches(&self, root: InputRoot, file_name: &str) -> bool {
        self.root == root && (self.predicate)(file_name)
    }
}

impl std::fmt::Debug for ClassificationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationRule")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("category", &self.category)
            .finish()
    }
}

fn is_daily_note(name: &str) -> bool {
    DAILY_NOTE_NAME.is_match(name)
}

fn is_brain_dump_note(name: &str) -> bool {
    name.to_lowercase().contains("brain-dump")
}

fn has_conversation_keyword(name: &str) -> bool {
    let lower = name.to_lowercase();
    CONVERSATION_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

fn is_plain_transcript(name: &str) -> bool {
    !has_conversation_keyword(name) && extension_of(name).as_deref() == Some("md")
}

fn any_file(_name: &str) -> bool {
    true
}

fn is_extracted_document(name: &str) -> bool {
    extension_of(name).is_some_and(|ext| EXTRACTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Ordered classifier. The first matching rule wins; no match drops the file.
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            rules: Self::default_rules(),
        }
    }

    fn default_rules() -> Vec<ClassificationRule> {
        vec![
            ClassificationRule {
                name: "daily-note",
                root: InputRoot::Notes,
                category: MemoryCategory::DailyNotes,
                predicate: is_daily_note,
            },
            ClassificationRule {
                name: "brain-dump-note",
                root: InputRoot::Notes,
                category: MemoryCategory::BrainDumps,
                predicate: is_brain_dump_note,
            },
            ClassificationRule {
                name: "plain-transcript",
                root: InputRoot::Transcripts,
                category: MemoryCategory::BrainDumps,
                predicate: is_plain_transcript,
            },
            ClassificationRule {
                name: "conversation-transcript",
                root: InputRoot::Transcripts,
                category: MemoryCategory::ConversationLogs,
                predicate: has_conversation_keyword,
            },
            ClassificationRule {
                name: "log",
                root: InputRoot::Logs,
                category: MemoryCategory::ConversationLogs,
                predicate: any_file,
            },
            ClassificationRule {
                name: "extracted-document",
                root: InputRoot::Extraction,
                category: MemoryCategory::ExtractedDocuments,
                predicate: is_extracted_document,
            },
        ]
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Category for a file found in `root`, or `None` if it is dropped.
    pub fn classify(&self, root: InputRoot, file_name: &str) -> Option<MemoryCategory> {
        self.rules
            .iter()
            .find(|rule| rule.matches(root, file_name))
            .map(|rule| rule.category)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
