use crate::types::ScoreRecord;
use crate::ShResult;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const LAST_SCORE_KEY: &str = "lastScore";
pub const HIGH_SCORE_KEY: &str = "highScore";

/// File-backed score store: one JSON object with two string-keyed
/// entries, `"lastScore"` and `"highScore"`, each the decimal text of
/// a non-negative integer. No versioning, no namespacing; unknown keys
/// are preserved on write and ignored on read.
///
/// Persistence is best-effort by contract: a failed read or write is
/// logged and swallowed, never propagated into the round-end flow. An
/// unparseable or missing entry reads back as unset, not zero.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists `final_score` as the last score unconditionally, and as
    /// the high score on strict improvement (no prior high means any
    /// score wins). Returns whether the write actually landed so the
    /// caller can render "score not saved" — it never fails the round.
    pub fn save(&self, final_score: u32) -> bool {
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            warn!("score store unreadable, starting fresh: {}", e);
            BTreeMap::new()
        });

        entries.insert(LAST_SCORE_KEY.to_string(), final_score.to_string());

        let prior_high = entries
            .get(HIGH_SCORE_KEY)
            .and_then(|s| s.trim().parse::<u32>().ok());
        if prior_high.map_or(true, |high| final_score > high) {
            entries.insert(HIGH_SCORE_KEY.to_string(), final_score.to_string());
        }

        match self.write_entries(&entries) {
            Ok(()) => true,
            Err(e) => {
                warn!("score not saved: {}", e);
                false
            }
        }
    }

    /// Reads both scores. Never fails: a missing file, bad JSON, or
    /// garbage entry text all collapse to unset fields.
    pub fn load(&self) -> ScoreRecord {
        let entries = self.read_entries().unwrap_or_else(|e| {
            debug!("score store unreadable: {}", e);
            BTreeMap::new()
        });
        let parse = |key: &str| entries.get(key).and_then(|s| s.trim().parse::<u32>().ok());
        ScoreRecord {
            last_score: parse(LAST_SCORE_KEY),
            high_score: parse(HIGH_SCORE_KEY),
        }
    }

    /// `load`, but preferring an in-memory hand-off for the last score.
    /// The results path passes the score it was just handed so it can
    /// render without trusting (or waiting on) the persisted value.
    pub fn load_with_handoff(&self, handoff: Option<u32>) -> ScoreRecord {
        let mut record = self.load();
        if let Some(score) = handoff {
            record.last_score = Some(score);
        }
        record
    }

    fn read_entries(&self) -> ShResult<BTreeMap<String, String>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> ShResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}
