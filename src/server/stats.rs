use std::collections::HashMap;
use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::config::schema::LoggingConfig;
use crate::protocol::StatsResponse;

// ---------------------------------------------------------------------------
// Usage log entry (JSONL)
// ---------------------------------------------------------------------------

/// A single entry in the usage log (`~/.tonedown/usage-log.jsonl`).
///
/// One entry is appended per successful rewrite. On startup the server
/// replays the log to rebuild its counters, so `/get-stats` survives
/// restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEvent {
    pub timestamp: String,
    /// Tone id the rewrite was requested with, recorded as sent.
    pub tone: String,
    /// Wall-clock time of the LLM call in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
}

impl UsageEvent {
    /// Build an event stamped with the current time.
    pub fn now(tone: &str, latency_ms: Option<u64>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            tone: tone.to_string(),
            latency_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory counters
// ---------------------------------------------------------------------------

/// Counters backing `/get-stats`.
///
/// `toxicity_removed` exists in the wire format but nothing increments it
/// yet; it reports 0.
#[derive(Debug, Clone)]
pub struct UsageStats {
    pub emails_processed: u64,
    pub tone_counts: HashMap<String, u64>,
    pub toxicity_removed: u64,
}

impl UsageStats {
    /// Fresh counters with the three stock tones seeded at zero.
    pub fn new() -> Self {
        let mut tone_counts = HashMap::new();
        for tone in ["professional", "polite", "neutral"] {
            tone_counts.insert(tone.to_string(), 0);
        }
        Self {
            emails_processed: 0,
            tone_counts,
            toxicity_removed: 0,
        }
    }

    /// Rebuild counters by replaying logged events.
    pub fn rebuild(events: &[UsageEvent]) -> Self {
        let mut stats = Self::new();
        for event in events {
            stats.record_rewrite(&event.tone);
        }
        stats
    }

    /// Count one successful rewrite. Unknown tone ids get their own counter.
    pub fn record_rewrite(&mut self, tone: &str) {
        self.emails_processed += 1;
        *self.tone_counts.entry(tone.to_string()).or_insert(0) += 1;
    }

    /// The tone with the highest rewrite count.
    ///
    /// Ties break alphabetically. With no rewrites recorded yet, reports
    /// "professional".
    pub fn most_used_tone(&self) -> String {
        self.tone_counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(tone, _)| tone.clone())
            .unwrap_or_else(|| "professional".to_string())
    }

    /// Snapshot the counters as a `/get-stats` response body.
    pub fn to_response(&self) -> StatsResponse {
        StatsResponse {
            success: true,
            error: None,
            emails_processed: self.emails_processed,
            toxicity_removed: self.toxicity_removed,
            most_used_tone: self.most_used_tone(),
            active_users: 1,
        }
    }
}

impl Default for UsageStats {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

/// Resolve the usage log path from config.
///
/// Returns `None` when logging is disabled or the path cannot be resolved,
/// in which case the server runs with in-memory counters only.
pub fn usage_log_path(config: &LoggingConfig) -> Option<PathBuf> {
    if !config.enabled {
        return None;
    }
    config::expand_home(&config.path)
}

/// Append one event to the usage log, creating the file and its parent
/// directory as needed.
pub fn append_usage_event(path: &Path, event: &UsageEvent) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(event)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Read all events from the usage log.
///
/// Silently skips malformed lines. Returns an empty vec if the file does
/// not exist or cannot be read.
pub fn read_usage_events(path: &Path) -> Vec<UsageEvent> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<UsageEvent>(&line).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_stats_seed_stock_tones() {
        let stats = UsageStats::new();
        assert_eq!(stats.emails_processed, 0);
        assert_eq!(stats.tone_counts.get("professional"), Some(&0));
        assert_eq!(stats.tone_counts.get("polite"), Some(&0));
        assert_eq!(stats.tone_counts.get("neutral"), Some(&0));
        assert_eq!(stats.most_used_tone(), "professional");
    }

    #[test]
    fn record_rewrite_bumps_counters() {
        let mut stats = UsageStats::new();
        stats.record_rewrite("polite");
        stats.record_rewrite("polite");
        stats.record_rewrite("legal");

        assert_eq!(stats.emails_processed, 3);
        assert_eq!(stats.tone_counts.get("polite"), Some(&2));
        assert_eq!(stats.tone_counts.get("legal"), Some(&1));
        assert_eq!(stats.most_used_tone(), "polite");
    }

    #[test]
    fn most_used_tone_breaks_ties_alphabetically() {
        let mut stats = UsageStats::new();
        stats.record_rewrite("neutral");
        stats.record_rewrite("polite");
        assert_eq!(stats.most_used_tone(), "neutral");
    }

    #[test]
    fn to_response_snapshots_counters() {
        let mut stats = UsageStats::new();
        stats.record_rewrite("tech");

        let resp = stats.to_response();
        assert!(resp.success);
        assert_eq!(resp.emails_processed, 1);
        assert_eq!(resp.toxicity_removed, 0);
        assert_eq!(resp.most_used_tone, "tech");
        assert_eq!(resp.active_users, 1);
    }

    #[test]
    fn rebuild_replays_events() {
        let events = vec![
            UsageEvent::now("professional", Some(120)),
            UsageEvent::now("professional", None),
            UsageEvent::now("polite", Some(90)),
        ];
        let stats = UsageStats::rebuild(&events);
        assert_eq!(stats.emails_processed, 3);
        assert_eq!(stats.most_used_tone(), "professional");
    }

    #[test]
    fn append_then_read_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("usage-log.jsonl");

        append_usage_event(&path, &UsageEvent::now("professional", Some(200))).unwrap();
        append_usage_event(&path, &UsageEvent::now("legal", None)).unwrap();

        let events = read_usage_events(&path);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tone, "professional");
        assert_eq!(events[0].latency_ms, Some(200));
        assert_eq!(events[1].tone, "legal");
        assert_eq!(events[1].latency_ms, None);
    }

    #[test]
    fn read_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage-log.jsonl");

        append_usage_event(&path, &UsageEvent::now("polite", None)).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "not json at all").unwrap();
        append_usage_event(&path, &UsageEvent::now("tech", None)).unwrap();

        let events = read_usage_events(&path);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].tone, "tech");
    }

    #[test]
    fn missing_log_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let events = read_usage_events(&dir.path().join("nope.jsonl"));
        assert!(events.is_empty());
    }

    #[test]
    fn disabled_logging_has_no_path() {
        let mut config = LoggingConfig::default();
        config.enabled = false;
        assert!(usage_log_path(&config).is_none());

        config.enabled = true;
        config.path = "/tmp/tonedown-test.jsonl".to_string();
        assert_eq!(
            usage_log_path(&config),
            Some(PathBuf::from("/tmp/tonedown-test.jsonl"))
        );
    }
}
