//! Document and manifest types shared by the pipeline and the dashboard.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Advisory layout width carried in every manifest.
pub const VIEWPORT_TARGET: &str = "900-1000px";

/// The four fixed document classifications.
///
/// Declaration order is the fixed category order used for the search index
/// and the manifest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryCategory {
    DailyNotes,
    BrainDumps,
    ConversationLogs,
    ExtractedDocuments,
}

impl MemoryCategory {
    pub const ALL: [MemoryCategory; 4] = [
        MemoryCategory::DailyNotes,
        MemoryCategory::BrainDumps,
        MemoryCategory::ConversationLogs,
        MemoryCategory::ExtractedDocuments,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MemoryCategory::DailyNotes => "daily-notes",
            MemoryCategory::BrainDumps => "brain-dumps",
            MemoryCategory::ConversationLogs => "conversation-logs",
            MemoryCategory::ExtractedDocuments => "extracted-documents",
        }
    }

    /// Human readable label for chips and badges
    pub fn label(self) -> &'static str {
        match self {
            MemoryCategory::DailyNotes => "Daily Notes",
            MemoryCategory::BrainDumps => "Brain Dumps",
            MemoryCategory::ConversationLogs => "Conversation Logs",
            MemoryCategory::ExtractedDocuments => "Extracted Docs",
        }
    }

    /// Tags assigned to every document of this category
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            MemoryCategory::DailyNotes => &["daily"],
            MemoryCategory::BrainDumps => &["brain-dump", "transcript"],
            MemoryCategory::ConversationLogs => &["conversation", "log"],
            MemoryCategory::ExtractedDocuments => &["extracted", "documents"],
        }
    }

    /// File name of this category's artifact
    pub fn artifact_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for MemoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemoryCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown category '{}' (expected one of: {})",
                    s,
                    MemoryCategory::ALL.map(|c| c.as_str()).join(", ")
                )
            })
    }
}

/// One processed input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryDocument {
    pub id: String,
    pub category: MemoryCategory,
    pub title: String,
    pub source: String,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub summary: String,
    pub content: String,
}

/// Summary metadata of one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryManifest {
    pub generated_at: String,
    pub total_documents: usize,
    pub categories: BTreeMap<MemoryCategory, usize>,
    pub viewport_target: String,
}

impl MemoryManifest {
    pub fn new(generated_at: DateTime<Utc>, counts: BTreeMap<MemoryCategory, usize>) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_documents: counts.values().sum(),
            categories: counts,
            viewport_target: VIEWPORT_TARGET.to_string(),
        }
    }

    pub fn count(&self, category: MemoryCategory) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }
}

/// Newest first, undated last, then title ascending.
///
/// ISO `YYYY-MM-DD` strings compare correctly as plain strings.
pub fn by_date_desc(a: &MemoryDocument, b: &MemoryDocument) -> Ordering {
    match (&a.date, &b.date) {
        (Some(da), Some(db)) => db.cmp(da).then_with(|| a.title.cmp(&b.title)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.title.cmp(&b.title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn doc(title: &str, date: Option<&str>) -> MemoryDocument {
        MemoryDocument {
            id: title.to_string(),
            category: MemoryCategory::DailyNotes,
            title: title.to_string(),
            source: String::new(),
            date: date.map(str::to_string),
            tags: Vec::new(),
            summary: String::new(),
            content: String::new(),
        }
    }

    #[test]
    fn test_ordering_dated_before_undated() {
        let mut docs = vec![
            doc("undated", None),
            doc("january", Some("2024-01-01")),
            doc("march", Some("2024-03-01")),
        ];
        docs.sort_by(by_date_desc);
        let titles: Vec<_> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["march", "january", "undated"]);
    }

    #[test]
    fn test_ordering_ties_by_title() {
        let mut docs = vec![
            doc("b", Some("2024-01-01")),
            doc("a", Some("2024-01-01")),
            doc("z", None),
            doc("y", None),
        ];
        docs.sort_by(by_date_desc);
        let titles: Vec<_> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "y", "z"]);
    }

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&MemoryCategory::ConversationLogs).unwrap();
        assert_eq!(json, "\"conversation-logs\"");
        assert_eq!(
            "extracted-documents".parse::<MemoryCategory>().unwrap(),
            MemoryCategory::ExtractedDocuments
        );
        assert!("notes".parse::<MemoryCategory>().is_err());
    }

    #[test]
    fn test_document_wire_shape() {
        let value = serde_json::to_value(doc("t", None)).unwrap();
        assert!(value.get("date").unwrap().is_null());
        assert_eq!(value["category"], "daily-notes");
    }

    #[test]
    fn test_manifest_shape() {
        let counts = MemoryCategory::ALL.into_iter().map(|c| (c, 2)).collect();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let manifest = MemoryManifest::new(at, counts);

        let json = serde_json::to_string(&manifest).unwrap();
        assert_eq!(
            json,
            "{\"generatedAt\":\"2024-05-01T12:00:00.000Z\",\"totalDocuments\":8,\
             \"categories\":{\"daily-notes\":2,\"brain-dumps\":2,\
             \"conversation-logs\":2,\"extracted-documents\":2},\
             \"viewportTarget\":\"900-1000px\"}"
        );
    }
}
