//! High score persistence
//!
//! The simulation only needs a best-score contract: read it, and offer a new
//! score that is kept only if it beats the stored one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Durable best-score storage
pub trait HighScoreStore {
    /// Best score recorded so far (0 when nothing is stored)
    fn load(&self) -> u64;

    /// Offer a finished run's score. Returns true if it became the new best.
    fn save(&mut self, score: u64) -> bool;
}

/// In-memory store, mostly for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScores {
    best: u64,
    saves: usize,
}

impl MemoryHighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u64) -> Self {
        Self { best, saves: 0 }
    }

    /// Number of times `save` has been called
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl HighScoreStore for MemoryHighScores {
    fn load(&self) -> u64 {
        self.best
    }

    fn save(&mut self, score: u64) -> bool {
        self.saves += 1;
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}

/// On-disk record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    score: u64,
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileHighScores {
    path: PathBuf,
    best: u64,
}

impl FileHighScores {
    /// Open the store at `path`. A missing or unreadable file starts at 0.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match Self::read(&path) {
            Some(record) => {
                log::info!("Loaded high score {} from {}", record.score, path.display());
                record.score
            }
            None => {
                log::info!("No high score at {}, starting fresh", path.display());
                0
            }
        };
        Self { path, best }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Option<HighScoreRecord> {
        let json = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&json) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Ignoring corrupt high score file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write(&self) {
        let record = HighScoreRecord { score: self.best };
        let result = serde_json::to_string_pretty(&record)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&self.path, json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => log::info!("High score {} saved", self.best),
            Err(e) => log::warn!("Failed to save high score to {}: {}", self.path.display(), e),
        }
    }
}

impl HighScoreStore for FileHighScores {
    fn load(&self) -> u64 {
        self.best
    }

    fn save(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.write();
        true
    }
}
