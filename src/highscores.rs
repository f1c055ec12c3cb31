//! Best-score persistence
//!
//! A single scalar survives between rounds: the best score. Stored as a
//! tiny JSON file; a missing or corrupt file just means starting from
//! zero. All I/O failures are logged and non-fatal.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct StoredScore {
    best: u64,
}

/// The persisted high score
#[derive(Debug, Clone, Default)]
pub struct HighScores {
    best: u64,
    path: Option<PathBuf>,
}

impl HighScores {
    /// In-memory only (tests, or hosts that persist elsewhere)
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the stored best from `path`, creating a fresh zero record if
    /// the file is missing or unreadable
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<StoredScore>(&json) {
                Ok(stored) => {
                    log::info!("loaded high score {} from {}", stored.best, path.display());
                    stored.best
                }
                Err(err) => {
                    log::warn!("corrupt high score file {}: {err}", path.display());
                    0
                }
            },
            Err(_) => {
                log::info!("no high score file at {}, starting fresh", path.display());
                0
            }
        };
        Self {
            best,
            path: Some(path),
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Whether a score would beat the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > 0 && score > self.best
    }

    /// Record a round's final score. Persists and returns true only when
    /// it beats the stored best; the stored value never decreases.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    fn save(&self) {
        let Some(path) = &self.path else { return };
        match serde_json::to_string(&StoredScore { best: self.best }) {
            Ok(json) => {
                if let Err(err) = fs::write(path, json) {
                    log::warn!("failed to write high score to {}: {err}", path.display());
                } else {
                    log::info!("high score {} saved", self.best);
                }
            }
            Err(err) => log::warn!("failed to encode high score: {err}"),
        }
    }
}
