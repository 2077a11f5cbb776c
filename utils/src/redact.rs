//! # Secret Redaction
//!
//! Pattern-based scrubber for text that leaves the controller inside a
//! delegated sub-call prompt. Lossy: long ordinary hex strings are redacted
//! too, and unknown credential shapes pass through.
//!
//! Rules run in order:
//! 1. PEM blocks, so key material is gone before line rules look at it
//! 2. provider credential shapes (bearer/basic auth, fixed-prefix key ids,
//!    named AWS secret keys)
//! 3. generic `name = value` / `name: value` assignments
//! 4. bare 32-64 character hex runs

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

/// Sentinel written in place of redacted material.
pub const REDACTED: &str = "[REDACTED]";

const MIN_HEX_RUN: usize = 32;
const MAX_HEX_RUN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replacement {
    /// Replace the whole match.
    Whole,
    /// Keep the `prefix` capture group, replace the rest.
    KeepPrefix,
    /// Replace alphanumeric runs made only of hex digits of secret length.
    HexRun,
}

const RULES: &[(&str, &str, Replacement)] = &[
    (
        "pem_block",
        r"(?s)-----BEGIN [A-Z0-9 ]+-----.*?-----END [A-Z0-9 ]+-----",
        Replacement::Whole,
    ),
    // A slice boundary can cut a key block in half.
    (
        "pem_unterminated",
        r"(?s)-----BEGIN [A-Z0-9 ]*PRIVATE KEY-----.*\z",
        Replacement::Whole,
    ),
    (
        "pem_orphan_end",
        r"(?s)\A.*?-----END [A-Z0-9 ]*PRIVATE KEY-----",
        Replacement::Whole,
    ),
    (
        "bearer_token",
        r"(?i)(?P<prefix>\bbearer\s+)[A-Za-z0-9._~+/=-]{8,}",
        Replacement::KeepPrefix,
    ),
    (
        "basic_auth",
        r"(?i)(?P<prefix>\bauthorization[ \t]*[:=][ \t]*basic\s+)[A-Za-z0-9+/=]+",
        Replacement::KeepPrefix,
    ),
    (
        "aws_access_key_id",
        r"\b(?:AKIA|ASIA|AGPA|AIDA|AROA|ANPA|ANVA|AIPA)[0-9A-Z]{16}\b",
        Replacement::Whole,
    ),
    (
        "github_token",
        r"\b(?:gh[pousr]_[A-Za-z0-9]{20,}|github_pat_[A-Za-z0-9_]{20,})",
        Replacement::Whole,
    ),
    ("sk_key", r"\bsk-[A-Za-z0-9_-]{20,}", Replacement::Whole),
    ("slack_token", r"\bxox[abprs]-[A-Za-z0-9-]{10,}", Replacement::Whole),
    (
        "aws_secret_access_key",
        r#"(?i)(?P<prefix>\baws_secret_access_key[ \t]*[:=][ \t]*)['"]?[A-Za-z0-9/+=]+['"]?"#,
        Replacement::KeepPrefix,
    ),
    (
        "named_assignment",
        r#"(?i)(?P<prefix>\b[A-Za-z0-9_.-]*(?:password|passwd|pwd|secret|token|api[_-]?key|access[_-]?key|private[_-]?key)[A-Za-z0-9_.-]*[ \t]*[:=][ \t]*)(?:"[^"\n]*"|'[^'\n]*'|[^\s'";&]+)"#,
        Replacement::KeepPrefix,
    ),
    ("hex_run", r"[0-9A-Za-z]+", Replacement::HexRun),
];

static DEFAULT_REDACTOR: LazyLock<SecretRedactor> = LazyLock::new(SecretRedactor::new);

/// Redact secrets with the default rule set.
///
/// Total: always returns a string, text without secrets comes back unchanged.
pub fn redact_secrets(text: &str) -> String {
    DEFAULT_REDACTOR.redact(text)
}

#[derive(Debug)]
struct RedactionRule {
    name: &'static str,
    regex: Regex,
    replacement: Replacement,
}

/// Ordered list of redaction rules.
#[derive(Debug)]
pub struct SecretRedactor {
    rules: Vec<RedactionRule>,
}

impl Default for SecretRedactor {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretRedactor {
    pub fn new() -> Self {
        let rules = RULES
            .iter()
            .map(|&(name, pattern, replacement)| RedactionRule {
                name,
                regex: Regex::new(pattern).expect("static redaction rule compiles"),
                replacement,
            })
            .collect();

        Self { rules }
    }

    /// Names of the active rules, in application order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            let replaced = match rule.replacement {
                Replacement::Whole => rule.regex.replace_all(&result, REDACTED),
                Replacement::KeepPrefix => rule
                    .regex
                    .replace_all(&result, format!("${{prefix}}{REDACTED}").as_str()),
                Replacement::HexRun => rule.regex.replace_all(&result, |caps: &Captures| {
                    let run = &caps[0];
                    if is_secret_hex(run) {
                        REDACTED.to_string()
                    } else {
                        run.to_string()
                    }
                }),
            };
            if let Cow::Owned(owned) = replaced {
                if owned != result {
                    debug!(rule = rule.name, "Redacted secret material");
                }
                result = owned;
            }
        }
        result
    }
}

fn is_secret_hex(run: &str) -> bool {
    (MIN_HEX_RUN..=MAX_HEX_RUN).contains(&run.len()) && run.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        let redactor = SecretRedactor::new();
        assert_eq!(redactor.rule_names().len(), RULES.len());
        assert_eq!(redactor.rule_names().first(), Some(&"pem_block"));
        assert_eq!(redactor.rule_names().last(), Some(&"hex_run"));
    }

    #[test]
    fn test_password_and_token_labels_retained() {
        let result = redact_secrets("password: hunter2 and token=abc123");
        assert!(!result.contains("hunter2"));
        assert!(!result.contains("abc123"));
        assert!(result.contains("password:"));
        assert!(result.contains("token="));
        assert_eq!(result, "password: [REDACTED] and token=[REDACTED]");
    }

    #[test]
    fn test_hex_adjacent_to_alphanumerics_kept() {
        let embedded = format!("x{}", "a".repeat(40));
        assert_eq!(redact_secrets(&embedded), embedded);

        let too_long = "f".repeat(65);
        assert_eq!(redact_secrets(&too_long), too_long);
    }

    #[test]
    fn test_hex_at_bounds_redacted() {
        assert_eq!(redact_secrets(&"0".repeat(32)), REDACTED);
        assert_eq!(redact_secrets(&"e".repeat(64)), REDACTED);
        assert_eq!(redact_secrets(&"e".repeat(31)), "e".repeat(31));
    }

    #[test]
    fn test_unquoted_value_stops_at_whitespace() {
        let result = redact_secrets("secret=abc def");
        assert_eq!(result, "secret=[REDACTED] def");
    }

    #[test]
    fn test_empty_value_does_not_swallow_next_line() {
        let text = "password:\nordinary words";
        assert_eq!(redact_secrets(text), text);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(redact_secrets(""), "");
    }
}
