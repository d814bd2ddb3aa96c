//! Best-effort secret redaction
//!
//! Three pattern groups run in order over the text:
//! 1. `label: value` / `label=value` pairs for credential-like labels. The
//!    label is kept, the value becomes `[REDACTED]`.
//! 2. Vendor token shapes (`sk-`, `ghp_`, `AIza`, `BSAI` prefixes).
//! 3. Any bare alphanumeric token longer than 30 characters.
//!
//! This is a heuristic, not a guarantee: secrets that fit none of the shapes
//! survive, and long legitimate identifiers (hashes, ids, URL segments) are
//! redacted too. Over-redaction is the intended failure mode.

use std::sync::LazyLock;

use regex::Regex;

pub const REDACTED: &str = "[REDACTED]";

/// A compiled redaction pattern with its replacement template
#[derive(Debug)]
pub struct RedactionRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
}

static REDACTION_RULES: LazyLock<Vec<RedactionRule>> = LazyLock::new(|| {
    vec![
        RedactionRule {
            name: "labelled-secret",
            pattern: Regex::new(
                r"(?i)(api[_\s-]?key|token|secret|password|bearer|auth)\s*[:=]\s*(\S+)",
            )
            .unwrap(),
            replacement: "${1}: [REDACTED]",
        },
        RedactionRule {
            name: "vendor-token",
            pattern: Regex::new(
                r"\b(BSAI[A-Za-z0-9_-]{8,}|sk-[A-Za-z0-9_-]{8,}|ghp_[A-Za-z0-9_]{20,}|AIza[0-9A-Za-z_-]{16,})\b",
            )
            .unwrap(),
            replacement: REDACTED,
        },
        RedactionRule {
            name: "long-token",
            pattern: Regex::new(r"\b[a-zA-Z0-9][a-zA-Z0-9_-]{30,}\b").unwrap(),
            replacement: REDACTED,
        },
    ]
});

/// The rules in application order
pub fn redaction_rules() -> &'static [RedactionRule] {
    &REDACTION_RULES
}

/// Apply every redaction rule, in order, to `text`.
///
/// Idempotent: running it on its own output changes nothing.
pub fn redact_sensitive(text: &str) -> String {
    let mut value = text.to_string();
    for rule in REDACTION_RULES.iter() {
        value = rule
            .pattern
            .replace_all(&value, rule.replacement)
            .into_owned();
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_pairs_keep_label() {
        assert_eq!(
            redact_sensitive("api_key: AKIA1234567890ABCDEF"),
            "api_key: [REDACTED]"
        );
        assert_eq!(redact_sensitive("password=hunter2 next"), "password: [REDACTED] next");
        assert_eq!(redact_sensitive("Token : abc"), "Token: [REDACTED]");
        assert_eq!(redact_sensitive("API Key: xyz"), "API Key: [REDACTED]");
    }

    #[test]
    fn test_vendor_tokens() {
        assert_eq!(redact_sensitive("use sk-abcdefgh123 now"), "use [REDACTED] now");
        let ghp = format!("ghp_{}", "a1".repeat(10));
        assert_eq!(redact_sensitive(&format!("x {ghp} y")), "x [REDACTED] y");
        assert_eq!(
            redact_sensitive("AIzaSyA1234567890abcdef"),
            "[REDACTED]"
        );
        // Too short for any vendor shape
        assert_eq!(redact_sensitive("sk-abc"), "sk-abc");
    }

    #[test]
    fn test_long_token_catch_all() {
        let long = "a".repeat(31);
        assert_eq!(redact_sensitive(&format!("hash {long} end")), "hash [REDACTED] end");
        let edge = "b".repeat(30);
        assert_eq!(redact_sensitive(&edge), edge);
        // Hyphens and underscores inside still count as one token
        let mixed = format!("{}-{}_{}", "c".repeat(12), "d".repeat(12), "e".repeat(12));
        assert_eq!(redact_sensitive(&mixed), REDACTED);
    }

    #[test]
    fn test_idempotent() {
        let once = redact_sensitive("token: abc and sk-abcdefghijk and secret=zzz");
        assert_eq!(redact_sensitive(&once), once);
        assert!(!once.contains("abc and"));
        assert!(!once.contains("zzz"));
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "Went for a walk, planned the garden.";
        assert_eq!(redact_sensitive(text), text);
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = redaction_rules().iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["labelled-secret", "vendor-token", "long-token"]);
    }
}
