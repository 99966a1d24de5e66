/// Pure rendering helpers shared by the console and the one-shot commands.
///
/// Everything here turns data into strings or segments without touching
/// state or doing I/O, so it can be tested directly.
use crate::toxicity::{Severity, ToxicSpan};

// ---------------------------------------------------------------------------
// Highlight segmentation
// ---------------------------------------------------------------------------

/// A piece of an analyzed email: either plain text or a highlighted toxic
/// phrase with its span metadata.
#[derive(Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Toxic { text: &'a str, span: &'a ToxicSpan },
}

/// Split an email into plain and highlighted segments using the byte
/// offsets reported by the server.
///
/// Spans are applied in offset order against the original text, so a
/// phrase occurring several times highlights each occurrence exactly
/// where it sits. Spans that overlap an earlier one, run past the end of
/// the text, or land off a char boundary are dropped rather than
/// corrupting the output.
pub fn split_highlights<'a>(email: &'a str, spans: &'a [ToxicSpan]) -> Vec<Segment<'a>> {
    let mut ordered: Vec<&ToxicSpan> = spans.iter().collect();
    ordered.sort_by_key(|s| (s.start, s.end));

    let mut segments = Vec::new();
    let mut cursor = 0usize;

    for span in ordered {
        if span.start < cursor
            || span.end > email.len()
            || span.start > span.end
            || !email.is_char_boundary(span.start)
            || !email.is_char_boundary(span.end)
        {
            continue;
        }
        if span.start > cursor {
            segments.push(Segment::Plain(&email[cursor..span.start]));
        }
        segments.push(Segment::Toxic {
            text: &email[span.start..span.end],
            span,
        });
        cursor = span.end;
    }

    if cursor < email.len() {
        segments.push(Segment::Plain(&email[cursor..]));
    }

    segments
}

// ---------------------------------------------------------------------------
// Toxicity summary
// ---------------------------------------------------------------------------

/// Headline for a toxicity percentage bucket.
pub fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Clean => "✅ Clean - Minimal toxicity detected",
        Severity::Moderate => "⚠️ Moderate - Some passive-aggressive language",
        Severity::High => "🔥 High - Significant hostility detected",
        Severity::Severe => "💀 Severe - Extremely toxic communication",
    }
}

/// Render a fixed-width meter like `[######----]` for a value out of `max`.
pub fn meter(value: u64, max: u64, width: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((value.min(max) as usize) * width) / max as usize
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
