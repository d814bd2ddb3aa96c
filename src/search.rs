//! Fuzzy ranked search over memory documents
//!
//! Scoring model:
//! - Each searchable field is matched with approximate substring matching:
//!   the fewest edits needed to turn the pattern into some substring of the
//!   field, divided by the pattern length. 0 is an exact hit.
//! - A field matches when its score is within the threshold. Match position
//!   is ignored.
//! - A document's score is the product over its matching fields of
//!   `score ^ (key_weight * field_norm)`, where shorter fields weigh more.
//!   Lower is better.

use crate::memory::MemoryDocument;

/// Default looseness: allows about one edit per three pattern chars
pub const DEFAULT_THRESHOLD: f64 = 0.35;

/// Longer patterns are scored in chunks of this many chars
const MAX_PATTERN_CHARS: usize = 32;

/// Document fields that can be searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKey {
    Title,
    Summary,
    Content,
    Source,
    Tags,
}

impl SearchKey {
    pub const ALL: [SearchKey; 5] = [
        SearchKey::Title,
        SearchKey::Summary,
        SearchKey::Content,
        SearchKey::Source,
        SearchKey::Tags,
    ];

    fn values(self, doc: &MemoryDocument) -> Vec<&str> {
        match self {
            SearchKey::Title => vec![doc.title.as_str()],
            SearchKey::Summary => vec![doc.summary.as_str()],
            SearchKey::Content => vec![doc.content.as_str()],
            SearchKey::Source => vec![doc.source.as_str()],
            SearchKey::Tags => doc.tags.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub threshold: f64,
    pub keys: Vec<SearchKey>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            keys: SearchKey::ALL.to_vec(),
        }
    }
}

/// One ranked hit
#[derive(Debug, Clone, Copy)]
pub struct SearchMatch<'a> {
    pub item: &'a MemoryDocument,
    /// Position in the indexed list
    pub index: usize,
    pub score: f64,
}

/// A pre-lowercased field value with its length norm
#[derive(Debug, Clone)]
struct FieldValue {
    chars: Vec<char>,
    norm: f64,
}

impl FieldValue {
    fn new(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        let tokens = text.split(' ').filter(|t| !t.is_empty()).count().max(1);
        let norm = (1.0 / (tokens as f64).sqrt() * 1000.0).round() / 1000.0;
        Some(Self {
            chars: text.to_lowercase().chars().collect(),
            norm,
        })
    }
}

/// Search structure over a borrowed list of documents.
///
/// Building and searching never modify the documents.
pub struct FuzzyIndex<'a> {
    docs: Vec<&'a MemoryDocument>,
    threshold: f64,
    key_weight: f64,
    /// records[doc][key] -> values of that key
    records: Vec<Vec<Vec<FieldValue>>>,
}

impl<'a> FuzzyIndex<'a> {
    pub fn new<I>(docs: I, options: SearchOptions) -> Self
    where
        I: IntoIterator<Item = &'a MemoryDocument>,
    {
        let docs: Vec<&'a MemoryDocument> = docs.into_iter().collect();
        let records = docs
            .iter()
            .map(|doc| {
                options
                    .keys
                    .iter()
                    .map(|key| {
                        key.values(doc)
                            .into_iter()
                            .filter_map(FieldValue::new)
                            .collect()
                    })
                    .collect()
            })
            .collect();

        Self {
            docs,
            threshold: options.threshold,
            key_weight: 1.0 / options.keys.len().max(1) as f64,
            records,
        }
    }

    /// Matching documents, most relevant first; ties keep list order.
    pub fn search(&self, query: &str) -> Vec<SearchMatch<'a>> {
        let pattern: Vec<char> = query.to_lowercase().chars().collect();
        if pattern.is_empty() {
            return Vec::new();
        }
        let chunks = pattern_chunks(&pattern);

        let mut hits: Vec<SearchMatch<'a>> = Vec::new();
        for (index, fields) in self.records.iter().enumerate() {
            let mut total = 1.0f64;
            let mut matched = false;

            for values in fields {
                for value in values {
                    if let Some(score) = self.score_value(&chunks, &value.chars) {
                        matched = true;
                        let base = if score == 0.0 { f64::EPSILON } else { score };
                        total *= base.powf(self.key_weight * value.norm);
                    }
                }
            }

            if matched {
                hits.push(SearchMatch {
                    item: self.docs[index],
                    index,
                    score: total,
                });
            }
        }

        hits.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.index.cmp(&b.index)));
        hits
    }

    /// Score of one field value, or `None` if no chunk is within threshold.
    fn score_value(&self, chunks: &[&[char]], text: &[char]) -> Option<f64> {
        let mut any_match = false;
        let mut total = 0.0;
        for chunk in chunks {
            let score = approximate_distance(chunk, text) as f64 / chunk.len() as f64;
            if score <= self.threshold {
                any_match = true;
                total += score;
            } else {
                total += 1.0;
            }
        }
        any_match.then(|| total / chunks.len() as f64)
    }
}

/// Split a long pattern into 32-char chunks; a remainder becomes the
/// trailing 32 chars of the pattern.
fn pattern_chunks(pattern: &[char]) -> Vec<&[char]> {
    if pattern.len() <= MAX_PATTERN_CHARS {
        return vec![pattern];
    }
    let mut chunks: Vec<&[char]> = pattern.chunks_exact(MAX_PATTERN_CHARS).collect();
    if pattern.len() % MAX_PATTERN_CHARS != 0 {
        chunks.push(&pattern[pattern.len() - MAX_PATTERN_CHARS..]);
    }
    chunks
}

/// Minimum edit distance between `pattern` and any substring of `text`.
fn approximate_distance(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();
    // column[i]: best distance of pattern[..i] ending at the current text char
    let mut column: Vec<usize> = (0..=m).collect();
    let mut best = m;

    for &tc in text {
        let mut diagonal = column[0];
        column[0] = 0;
        for i in 1..=m {
            let left = column[i];
            let cost = usize::from(pattern[i - 1] != tc);
            column[i] = (left + 1).min(column[i - 1] + 1).min(diagonal + cost);
            diagonal = left;
        }
        best = best.min(column[m]);
        if best == 0 {
            break;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCategory;

    fn doc(title: &str, content: &str) -> MemoryDocument {
        MemoryDocument {
            id: title.to_string(),
            category: MemoryCategory::BrainDumps,
            title: title.to_string(),
            source: format!("transcripts/{}.md", title),
            date: None,
            tags: vec!["brain-dump".to_string(), "transcript".to_string()],
            summary: content.chars().take(40).collect(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_approximate_distance() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(approximate_distance(&chars("deploy"), &chars("run the deploy script")), 0);
        // Dropping the stray 'y' leaves "deplo", a substring of the text
        assert_eq!(approximate_distance(&chars("deplyo"), &chars("run the deploy script")), 1);
        assert_eq!(approximate_distance(&chars("depoly"), &chars("run the deploy script")), 2);
        assert_eq!(approximate_distance(&chars("dploy"), &chars("deploy")), 1);
        assert_eq!(approximate_distance(&chars("abc"), &chars("")), 3);
    }

    #[test]
    fn test_exact_and_typo_matches() {
        let docs = vec![
            doc("garden", "planted tomatoes and basil"),
            doc("deploy", "run the deploy script carefully"),
            doc("groceries", "milk eggs bread"),
        ];
        let index = FuzzyIndex::new(&docs, SearchOptions::default());

        let hits = index.search("deploy");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item.title, "deploy");

        // One transposition is two edits out of six chars: still under 0.35
        let hits = index.search("depoly");
        assert_eq!(hits[0].item.title, "deploy");

        assert!(index.search("zzzzzz").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let docs = vec![doc("Plans", "Quarterly PLANNING notes")];
        let index = FuzzyIndex::new(&docs, SearchOptions::default());
        assert_eq!(index.search("planning").len(), 1);
    }

    #[test]
    fn test_more_matching_fields_rank_higher() {
        let docs = vec![
            doc("notes", "something about tomatoes"),
            doc("tomatoes", "tomatoes everywhere"),
        ];
        let index = FuzzyIndex::new(&docs, SearchOptions::default());
        let hits = index.search("tomatoes");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].item.title, "tomatoes");
        assert!(hits[0].score <= hits[1].score);
    }

    #[test]
    fn test_ties_keep_list_order() {
        let docs = vec![doc("a", "same text"), doc("b", "same text")];
        let index = FuzzyIndex::new(&docs, SearchOptions::default());
        let hits = index.search("brain");
        // Both match only through the shared tags
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].index, 0);
        assert_eq!(hits[1].index, 1);
    }

    #[test]
    fn test_long_patterns_are_chunked() {
        let long = "the quick brown fox jumps over the lazy dog again and again";
        let docs = vec![doc("fox", long), doc("other", "nothing related here")];
        let index = FuzzyIndex::new(&docs, SearchOptions::default());
        let hits = index.search(long);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item.title, "fox");

        let pattern: Vec<char> = long.chars().collect();
        let chunks = pattern_chunks(&pattern);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == MAX_PATTERN_CHARS));
    }

    #[test]
    fn test_field_norm() {
        let one = FieldValue::new("word").unwrap();
        let four = FieldValue::new("a b c d").unwrap();
        assert_eq!(one.norm, 1.0);
        assert_eq!(four.norm, 0.5);
        assert!(FieldValue::new("   ").is_none());
    }
}
