//! Safety gate: prompt-injection screening.
//!
//! A fixed set of known injection/exfiltration phrasings is matched against
//! the raw request text before any other processing. A match short-circuits
//! the pipeline: no redaction, embedding, cache, or model work happens for a
//! blocked request.

use once_cell::sync::Lazy;
use regex::RegexSet;

/// Fixed response text for blocked requests.
pub const BLOCKED_MESSAGE: &str = "Request blocked by safety gate (suspected prompt injection).";

static INJECTION_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)ignore (all|any|previous) instructions",
        r"(?i)reveal (the )?(system|developer) prompt",
        r"(?i)you are now (dan|developer mode)",
        r"(?i)bypass (policy|safety)",
        r"(?i)exfiltrate|leak|steal",
    ])
    .expect("injection patterns are valid regexes")
});

/// Returns `true` when `text` matches a known prompt-injection pattern.
///
/// Fail-closed and zero-cost: no allocation, no I/O.
pub fn is_prompt_injection(text: &str) -> bool {
    INJECTION_PATTERNS.is_match(text)
}
