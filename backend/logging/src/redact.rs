//! Log Redaction Layer
//!
//! Scrubs AWS access key ids, session tokens, and bearer tokens from strings
//! prior to logging. Service error bodies sometimes echo request headers.

use regex::Regex;
use std::sync::LazyLock;

static ACCESS_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:AKIA|ASIA)[A-Z0-9]{16}\b").unwrap());
static SESSION_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(x-amz-security-token["']?\s*[:=]\s*["']?)[A-Za-z0-9/+=]+"#).unwrap()
});
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let mut redacted = ACCESS_KEY_RE
        .replace_all(input, "[REDACTED_ACCESS_KEY]")
        .to_string();

    redacted = SESSION_TOKEN_RE
        .replace_all(&redacted, "${1}[REDACTED_TOKEN]")
        .to_string();

    redacted = BEARER_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .to_string();

    redacted
}
