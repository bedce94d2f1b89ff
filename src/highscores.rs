//! Leaderboard of the best finished sessions
//!
//! Persisted as plain text, one `name:score` record per line, top 10 kept.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Longest name stored with a score
pub const MAX_NAME_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("failed to access high score file: {0}")]
    Io(#[from] std::io::Error),
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's name
    pub name: String,
    /// Enemies destroyed
    pub score: u32,
}

impl HighScoreEntry {
    /// Parse one `name:score` record; the score follows the last colon
    pub fn parse(line: &str) -> Option<Self> {
        let (name, score) = line.trim().rsplit_once(':')?;
        let name = sanitize_name(name)?;
        let score = score.trim().parse().ok()?;
        Some(Self { name, score })
    }
}

impl fmt::Display for HighScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.score)
    }
}

/// Make a name safe for the record format; `None` if nothing is left
pub fn sanitize_name(name: &str) -> Option<String> {
    let cleaned: String = name
        .chars()
        .filter(|c| *c != ':' && !c.is_control())
        .collect();
    let cleaned: String = cleaned.trim().chars().take(MAX_NAME_LEN).collect();
    let cleaned = cleaned.trim_end().to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Best scores, highest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `name:score` lines, skipping anything malformed
    pub fn parse(text: &str) -> Self {
        let mut scores = Self::new();
        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match HighScoreEntry::parse(line) {
                Some(entry) => {
                    scores.insert(entry);
                }
                None => log::warn!("Skipping malformed high score line {}: {:?}", number + 1, line),
            }
        }
        scores
    }

    /// One `name:score` record per line, best first
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}\n", e))
            .collect()
    }

    /// Would `score` earn a place on the board?
    pub fn qualifies(&self, score: u32) -> bool {
        score > 0
            && (self.entries.len() < MAX_HIGH_SCORES
                || self.entries.last().is_none_or(|lowest| score > lowest.score))
    }

    /// 1-based rank `score` would take, `None` if it would not make the board
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        self.qualifies(score).then(|| self.slot_for(score) + 1)
    }

    /// Record a score; returns its 1-based rank, `None` if it did not place
    /// or the name sanitized to nothing
    pub fn add_score(&mut self, name: &str, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let name = sanitize_name(name)?;
        self.insert(HighScoreEntry { name, score })
    }

    /// Index a new score lands at; ties go below older entries
    fn slot_for(&self, score: u32) -> usize {
        self.entries.iter().take_while(|e| e.score >= score).count()
    }

    fn insert(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let slot = self.slot_for(entry.score);
        if slot >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(slot, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score on the board
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from a file; a missing file is an empty board
    pub fn load(path: &Path) -> Result<Self, HighScoreError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let scores = Self::parse(&text);
                log::info!("Loaded {} high scores", scores.entries.len());
                Ok(scores)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score file at {}", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load, falling back to an empty board on any error
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{} - starting with empty high scores", e);
            Self::new()
        })
    }

    /// Save high scores to a file
    pub fn save(&self, path: &Path) -> Result<(), HighScoreError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_text())?;
        log::info!("Saved {} high scores to {}", self.entries.len(), path.display());
        Ok(())
    }
}
