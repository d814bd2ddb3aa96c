//! Rules module
//!
//! Ordered file classification and secret redaction patterns.

mod classification;
mod redaction;

pub use classification::{
    ClassificationRule, Classifier, InputRoot, CONVERSATION_KEYWORDS, EXTRACTED_EXTENSIONS,
};
pub use redaction::{redact_sensitive, redaction_rules, RedactionRule, REDACTED};
