//! Score extraction from free-form LLM responses.
//!
//! The decode prompt asks for a labelled `PASSIVE-AGGRESSIVE SCORE: [X/10]`
//! line, but models phrase it loosely. Extraction therefore scans the whole
//! response for the first `X/10` instead of parsing line structure.

use std::sync::LazyLock;

use regex::Regex;

/// Matches an `X/10` score, tolerating whitespace around the slash.
static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*/\s*10").expect("score regex must compile"));

/// Pull the passive-aggressive score out of a decode response.
///
/// Takes the first `X/10` found. Values above 10 clamp to 10. A response
/// with no recognizable score reads as the midpoint 5.
pub fn extract_aggression_score(analysis: &str) -> u8 {
    SCORE_RE
        .captures(analysis)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(|n| n.min(10) as u8)
        .unwrap_or(5)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
