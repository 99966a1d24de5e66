//! Deterministic passive-aggression scanner.
//!
//! Matches a fixed table of corporate phrases against an email and reports
//! every occurrence as an offset span with a per-phrase score and a
//! plain-language translation. No LLM is involved — `/analyze-toxicity` is
//! the one endpoint that works offline.
//!
//! Offsets are byte indices into the scanned string. All patterns are ASCII
//! and matching lowercases with [`str::to_ascii_lowercase`], which preserves
//! byte length, so a span always indexes the original text exactly.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pattern table
// ---------------------------------------------------------------------------

/// A known passive-aggressive phrase with its toxicity score (1-10) and
/// what the sender actually means.
#[derive(Debug, Clone, Copy)]
pub struct ToxicPattern {
    pub phrase: &'static str,
    pub score: u32,
    pub meaning: &'static str,
}

pub const TOXIC_PATTERNS: &[ToxicPattern] = &[
    ToxicPattern {
        phrase: "per my last email",
        score: 10,
        meaning: "Translation: You ignored me",
    },
    ToxicPattern {
        phrase: "as i mentioned",
        score: 8,
        meaning: "Translation: Were you even listening?",
    },
    ToxicPattern {
        phrase: "just following up",
        score: 7,
        meaning: "Translation: Why haven't you responded?",
    },
    ToxicPattern {
        phrase: "circling back",
        score: 6,
        meaning: "Translation: Still waiting on this",
    },
    ToxicPattern {
        phrase: "per my previous",
        score: 9,
        meaning: "Translation: Read your damn email",
    },
    ToxicPattern {
        phrase: "friendly reminder",
        score: 7,
        meaning: "Translation: This is your last warning",
    },
    ToxicPattern {
        phrase: "as discussed",
        score: 6,
        meaning: "Translation: We already talked about this",
    },
    ToxicPattern {
        phrase: "just checking in",
        score: 5,
        meaning: "Translation: Where's my response?",
    },
    ToxicPattern {
        phrase: "to be clear",
        score: 7,
        meaning: "Translation: Since you don't understand",
    },
    ToxicPattern {
        phrase: "moving forward",
        score: 6,
        meaning: "Translation: Stop messing up",
    },
];

// ---------------------------------------------------------------------------
// Scan results
// ---------------------------------------------------------------------------

/// One flagged occurrence. `start..end` is the byte range of the phrase in
/// the scanned string. This type crosses the wire as an element of the
/// `/analyze-toxicity` highlight list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToxicSpan {
    pub phrase: String,
    pub start: usize,
    pub end: usize,
    pub toxicity: u32,
    pub meaning: String,
}

/// Everything the scanner found, plus the derived percentage.
#[derive(Debug, Clone, Default)]
pub struct ToxicityReport {
    /// Flagged spans ordered by start offset.
    pub spans: Vec<ToxicSpan>,
    pub total_score: u32,
    pub percent: u32,
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Scan an email for every occurrence of every known toxic phrase.
///
/// Case-insensitive. Repeated phrases produce one span per occurrence, each
/// with its own offsets, so a renderer can mark the right range even when
/// the same wording appears twice.
pub fn scan(email: &str) -> ToxicityReport {
    let lower = email.to_ascii_lowercase();

    let mut spans: Vec<ToxicSpan> = Vec::new();
    let mut total_score = 0;

    for pattern in TOXIC_PATTERNS {
        for (start, matched) in lower.match_indices(pattern.phrase) {
            spans.push(ToxicSpan {
                phrase: pattern.phrase.to_string(),
                start,
                end: start + matched.len(),
                toxicity: pattern.score,
                meaning: pattern.meaning.to_string(),
            });
            total_score += pattern.score;
        }
    }

    spans.sort_by_key(|s| (s.start, s.end));
    let percent = percent(total_score, spans.len());

    ToxicityReport {
        spans,
        total_score,
        percent,
    }
}

/// Toxicity as a percentage of the worst possible score for the spans found.
///
/// Each span can contribute at most 10 points, so the result is
/// `total * 100 / (count * 10)`, floored, capped at 100. No spans means 0.
pub fn percent(total_score: u32, span_count: usize) -> u32 {
    if span_count == 0 {
        return 0;
    }
    let max_possible = span_count as u32 * 10;
    ((total_score * 100) / max_possible).min(100)
}

// ---------------------------------------------------------------------------
// Severity buckets
// ---------------------------------------------------------------------------

/// Qualitative bucket for a toxicity percentage.
///
/// Boundaries are strict: 19 is still [`Severity::Clean`], 20 is
/// [`Severity::Moderate`], and so on at 50 and 80.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Clean,
    Moderate,
    High,
    Severe,
}

pub fn severity(percent: u32) -> Severity {
    if percent < 20 {
        Severity::Clean
    } else if percent < 50 {
        Severity::Moderate
    } else if percent < 80 {
        Severity::High
    } else {
        Severity::Severe
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_table_is_sane() {
        assert_eq!(TOXIC_PATTERNS.len(), 10);
        for p in TOXIC_PATTERNS {
            assert!(!p.phrase.is_empty());
            assert!(p.phrase.chars().all(|c| c.is_ascii()));
            assert_eq!(p.phrase, p.phrase.to_ascii_lowercase());
            assert!((1..=10).contains(&p.score));
            assert!(p.meaning.starts_with("Translation:"));
        }
    }

    #[test]
    fn clean_email_scans_empty() {
        let report = scan("Thanks for the quick turnaround, this looks great.");
        assert!(report.spans.is_empty());
        assert_eq!(report.total_score, 0);
        assert_eq!(report.percent, 0);
    }

    #[test]
    fn single_phrase_has_exact_offsets() {
        let email = "Hi team, just following up on the numbers.";
        let report = scan(email);
        assert_eq!(report.spans.len(), 1);

        let span = &report.spans[0];
        assert_eq!(span.phrase, "just following up");
        assert_eq!(&email[span.start..span.end], "just following up");
        assert_eq!(span.toxicity, 7);
        // One span scoring 7 of a possible 10.
        assert_eq!(report.percent, 70);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let email = "Per My Last Email, the deadline was Friday.";
        let report = scan(email);
        assert_eq!(report.spans.len(), 1);
        assert_eq!(report.spans[0].start, 0);
        assert_eq!(&email[report.spans[0].start..report.spans[0].end], "Per My Last Email");
    }

    #[test]
    fn repeated_phrase_yields_one_span_per_occurrence() {
        let email = "Just checking in again. I said just checking in.";
        let report = scan(email);
        assert_eq!(report.spans.len(), 2);
        assert_ne!(report.spans[0].start, report.spans[1].start);
        for span in &report.spans {
            assert_eq!(&email.to_ascii_lowercase()[span.start..span.end], "just checking in");
        }
        // Spans are ordered by position.
        assert!(report.spans[0].start < report.spans[1].start);
    }

    #[test]
    fn multiple_phrases_sum_scores() {
        let email = "Per my last email, just checking in. Moving forward, be on time.";
        let report = scan(email);
        assert_eq!(report.spans.len(), 3);
        assert_eq!(report.total_score, 10 + 5 + 6);
        // 21 of a possible 30.
        assert_eq!(report.percent, 70);
    }

    #[test]
    fn percent_formula() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(10, 1), 100);
        assert_eq!(percent(5, 1), 50);
        assert_eq!(percent(15, 2), 75);
        // Floored, not rounded.
        assert_eq!(percent(20, 3), 66);
        // Capped at 100 even for out-of-range inputs.
        assert_eq!(percent(50, 1), 100);
    }

    #[test]
    fn severity_boundaries_are_strict() {
        assert_eq!(severity(0), Severity::Clean);
        assert_eq!(severity(19), Severity::Clean);
        assert_eq!(severity(20), Severity::Moderate);
        assert_eq!(severity(49), Severity::Moderate);
        assert_eq!(severity(50), Severity::High);
        assert_eq!(severity(79), Severity::High);
        assert_eq!(severity(80), Severity::Severe);
        assert_eq!(severity(100), Severity::Severe);
    }

    #[test]
    fn spans_index_multibyte_text_safely() {
        // The scanned text may contain non-ASCII before a match; offsets are
        // byte offsets and must still slice cleanly.
        let email = "Résumé attached, just following up on it.";
        let report = scan(email);
        assert_eq!(report.spans.len(), 1);
        let span = &report.spans[0];
        assert_eq!(&email[span.start..span.end], "just following up");
    }
}
