//! High score leaderboard
//!
//! Top 10 `{name, score, date}` entries, sorted by score descending. Storage
//! is pluggable: memory for tests, a JSON file on native, LocalStorage on
//! the web.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LeaderboardError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;
/// Longer names are cut to this many characters
pub const MAX_NAME_CHARS: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
    /// When the score was submitted (RFC 3339 in JSON)
    pub date: DateTime<Utc>,
}

/// Incoming score, as posted by a client
///
/// Both fields are optional so a malformed request can be rejected with a
/// client error instead of failing to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub name: Option<String>,
    pub score: Option<u64>,
}

impl ScoreSubmission {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: Some(name.into()),
            score: Some(score),
        }
    }

    /// Empty names and zero scores count as missing
    fn validate(self) -> Result<(String, u64), LeaderboardError> {
        let name = self
            .name
            .filter(|n| !n.is_empty())
            .ok_or(LeaderboardError::InvalidSubmission { field: "name" })?;
        let score = self
            .score
            .filter(|&s| s > 0)
            .ok_or(LeaderboardError::InvalidSubmission { field: "score" })?;
        Ok((name.chars().take(MAX_NAME_CHARS).collect(), score))
    }
}

/// Where the leaderboard lives between runs
pub trait ScoreStore {
    /// Stored entries; an empty list when nothing was saved yet
    fn load(&self) -> Result<Vec<ScoreEntry>, LeaderboardError>;
    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), LeaderboardError>;
}

/// In-memory store (tests, sessions without persistence)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<ScoreEntry>,
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), LeaderboardError> {
        self.entries = entries.to_vec();
        Ok(())
    }
}

/// JSON array in a file on disk
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        log::info!(
            "High scores saved to {} ({} entries)",
            self.path.display(),
            entries.len()
        );
        Ok(())
    }
}

/// Browser LocalStorage under a fixed key
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub const DEFAULT_KEY: &'static str = "shatterfield_leaderboard";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, LeaderboardError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(LeaderboardError::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let storage = Self::storage()?;
        match storage.get_item(&self.key) {
            Ok(Some(json)) => Ok(serde_json::from_str(&json)?),
            Ok(None) => Ok(Vec::new()),
            Err(_) => Err(LeaderboardError::StorageUnavailable),
        }
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string(entries)?;
        Self::storage()?
            .set_item(&self.key, &json)
            .map_err(|_| LeaderboardError::StorageUnavailable)?;
        log::info!("High scores saved ({} entries)", entries.len());
        Ok(())
    }
}

/// Fetch and submit scores against a store
#[derive(Debug, Clone, Default)]
pub struct Leaderboard<S> {
    store: S,
}

impl<S: ScoreStore> Leaderboard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored entries, best first, at most [`MAX_HIGH_SCORES`]
    pub fn fetch(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let mut entries = self.store.load()?;
        rank(&mut entries);
        Ok(entries)
    }

    /// Submit a score stamped with the current time
    pub fn submit(&mut self, submission: ScoreSubmission) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        self.submit_at(submission, Utc::now())
    }

    /// Validate, merge, re-rank and persist; returns the updated list
    ///
    /// Ties keep their existing order, so an older entry stays ahead of a
    /// new one with the same score.
    pub fn submit_at(
        &mut self,
        submission: ScoreSubmission,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let (name, score) = submission.validate()?;
        let mut entries = self.store.load()?;
        entries.push(ScoreEntry {
            name,
            score,
            date: now,
        });
        rank(&mut entries);
        self.store.save(&entries)?;
        Ok(entries)
    }

    /// Whether a score would make the board
    pub fn qualifies(&self, score: u64) -> Result<bool, LeaderboardError> {
        Ok(self.potential_rank(score)?.is_some())
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't make the board)
    pub fn potential_rank(&self, score: u64) -> Result<Option<usize>, LeaderboardError> {
        if score == 0 {
            return Ok(None);
        }
        let entries = self.fetch()?;
        let rank = entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(entries.len());
        Ok((rank < MAX_HIGH_SCORES).then_some(rank + 1))
    }
}

/// Stable sort, best first, capped
fn rank(entries: &mut Vec<ScoreEntry>) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_HIGH_SCORES);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn board() -> Leaderboard<MemoryStore> {
        Leaderboard::new(MemoryStore::default())
    }

    #[test]
    fn test_empty_board_fetches_empty_list() {
        assert!(board().fetch().unwrap().is_empty());
    }

    #[test]
    fn test_submit_sorts_descending() {
        let mut board = board();
        board.submit_at(ScoreSubmission::new("ann", 300), at(0)).unwrap();
        board.submit_at(ScoreSubmission::new("bob", 900), at(1)).unwrap();
        let list = board.submit_at(ScoreSubmission::new("cy", 500), at(2)).unwrap();

        let scores: Vec<u64> = list.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 500, 300]);
        assert_eq!(list, board.fetch().unwrap());
        assert_eq!(list[1].date, at(2));
    }

    #[test]
    fn test_name_truncated_to_ten_chars() {
        let mut board = board();
        let list = board
            .submit_at(ScoreSubmission::new("Maximilian the Great", 100), at(0))
            .unwrap();
        assert_eq!(list[0].name, "Maximilian");

        let list = board
            .submit_at(ScoreSubmission::new("ÅÅÅÅÅÅÅÅÅÅÅÅ", 200), at(1))
            .unwrap();
        assert_eq!(list[0].name.chars().count(), 10);
    }

    #[test]
    fn test_missing_fields_are_client_errors() {
        let mut board = board();
        let cases = [
            (ScoreSubmission { name: None, score: Some(10) }, "name"),
            (ScoreSubmission { name: Some(String::new()), score: Some(10) }, "name"),
            (ScoreSubmission { name: Some("x".into()), score: None }, "score"),
            (ScoreSubmission { name: Some("x".into()), score: Some(0) }, "score"),
        ];
        for (submission, missing) in cases {
            let err = board.submit_at(submission, at(0)).unwrap_err();
            assert!(err.is_client_error());
            assert!(matches!(err, LeaderboardError::InvalidSubmission { field } if field == missing));
        }
        assert!(board.fetch().unwrap().is_empty());
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut board = board();
        for i in 1..=12u64 {
            board
                .submit_at(ScoreSubmission::new(format!("p{}", i), i * 10), at(i as i64))
                .unwrap();
        }
        let list = board.fetch().unwrap();
        assert_eq!(list.len(), MAX_HIGH_SCORES);
        assert_eq!(list[0].score, 120);
        assert_eq!(list[9].score, 30);
    }

    #[test]
    fn test_ties_keep_older_entry_first() {
        let mut board = board();
        board.submit_at(ScoreSubmission::new("first", 500), at(0)).unwrap();
        let list = board.submit_at(ScoreSubmission::new("second", 500), at(1)).unwrap();
        assert_eq!(list[0].name, "first");
        assert_eq!(list[1].name, "second");
    }

    #[test]
    fn test_potential_rank() {
        let mut board = board();
        assert_eq!(board.potential_rank(0).unwrap(), None);
        assert_eq!(board.potential_rank(50).unwrap(), Some(1));

        for i in 1..=10u64 {
            board
                .submit_at(ScoreSubmission::new("p", i * 100), at(0))
                .unwrap();
        }
        assert_eq!(board.potential_rank(1000).unwrap(), Some(2));
        assert_eq!(board.potential_rank(1001).unwrap(), Some(1));
        assert_eq!(board.potential_rank(150).unwrap(), Some(10));
        assert!(!board.qualifies(100).unwrap());
        assert!(board.qualifies(101).unwrap());
    }

    #[test]
    fn test_json_file_store_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "shatterfield-scores-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut board = Leaderboard::new(JsonFileStore::new(&path));
        assert!(board.fetch().unwrap().is_empty());
        board.submit_at(ScoreSubmission::new("ann", 700), at(5)).unwrap();

        let reopened = Leaderboard::new(JsonFileStore::new(&path));
        let list = reopened.fetch().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "ann");
        assert_eq!(list[0].date, at(5));

        std::fs::write(&path, "not json").unwrap();
        let err = reopened.fetch().unwrap_err();
        assert!(matches!(err, LeaderboardError::Corrupt(_)));
        assert!(!err.is_client_error());

        let _ = std::fs::remove_file(&path);
    }
}
