//! Bounded high-score list and the key-value stores it is persisted in.
//!
//! The list is stored as a JSON array under [`LEADERBOARD_KEY`]. Loading is
//! tolerant: an absent or malformed record is an empty list, and entries that
//! fail validation are dropped.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{NameError, StoreError};
use crate::initials::INITIALS_LEN;

/// Record key the leaderboard is stored under.
pub const LEADERBOARD_KEY: &str = "candy-snake-leaderboard";

const APP_DIR_NAME: &str = "candy-snake";

/// A validated 1-3 letter player name, stored uppercase.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        if let Some(bad) = trimmed.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(NameError::NotAlphabetic(bad));
        }
        let len = trimmed.chars().count();
        if len > INITIALS_LEN {
            return Err(NameError::TooLong(len));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: PlayerName,
    pub score: u32,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Top-N scores, sorted descending.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    capacity: usize,
}

impl Leaderboard {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Builds a board from arbitrary entries, sorting and truncating them.
    #[must_use]
    pub fn from_entries(entries: Vec<LeaderboardEntry>, capacity: usize) -> Self {
        let mut board = Self { entries, capacity };
        board.normalize();
        board
    }

    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest recorded score, if any.
    #[must_use]
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.score)
    }

    /// A score qualifies when it is positive and either the board has room or
    /// it beats the lowest entry.
    #[must_use]
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < self.capacity {
            return true;
        }
        self.entries.last().is_none_or(|lowest| score > lowest.score)
    }

    /// Rank (1-based) a qualifying score would take.
    #[must_use]
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let index = self
            .entries
            .iter()
            .position(|entry| score > entry.score)
            .unwrap_or(self.entries.len());
        Some(index + 1)
    }

    /// Appends `entry`, re-sorts and truncates. Returns its rank if it survived.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let inserted = entry.clone();
        self.entries.push(entry);
        self.normalize();
        self.entries
            .iter()
            .position(|candidate| *candidate == inserted)
            .map(|index| index + 1)
    }

    fn normalize(&mut self) {
        // Stable, so earlier entries win ties.
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(self.capacity);
    }

    /// Reads the board from `store`. Never fails: problems yield an empty or
    /// partial board and are logged.
    #[must_use]
    pub fn load_from(store: &dyn KeyValueStore, capacity: usize) -> Self {
        match store.get(LEADERBOARD_KEY) {
            Ok(raw) => Self::from_record(raw.as_deref(), capacity),
            Err(error) => {
                log::warn!("failed to read leaderboard, starting fresh: {error}");
                Self::new(capacity)
            }
        }
    }

    /// Parses a stored record. Absent or malformed records give an empty board.
    fn from_record(raw: Option<&str>, capacity: usize) -> Self {
        let Some(raw) = raw else {
            log::info!("no leaderboard record, starting fresh");
            return Self::new(capacity);
        };

        let values = match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
            Ok(values) => values,
            Err(error) => {
                log::warn!("malformed leaderboard record, starting fresh: {error}");
                return Self::new(capacity);
            }
        };

        let total = values.len();
        let entries: Vec<LeaderboardEntry> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if entries.len() < total {
            log::warn!(
                "dropped {} invalid leaderboard entries",
                total - entries.len()
            );
        }

        log::info!("loaded {} leaderboard entries", entries.len());
        Self::from_entries(entries, capacity)
    }

    /// Writes the board to `store`.
    pub fn save_to(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        store.set(LEADERBOARD_KEY, &json)?;
        log::info!("leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Reloads the stored board, inserts `entry`, and writes it back.
///
/// The returned board includes `entry` even when the write failed; the
/// failure is logged. If the store cannot be read, `entry` goes into a copy
/// of `current` and nothing is written, so an unreadable record is never
/// replaced.
pub fn submit_entry(
    store: &mut dyn KeyValueStore,
    current: &Leaderboard,
    entry: LeaderboardEntry,
) -> Leaderboard {
    let (mut board, writable) = match store.get(LEADERBOARD_KEY) {
        Ok(raw) => (
            Leaderboard::from_record(raw.as_deref(), current.capacity),
            true,
        ),
        Err(error) => {
            log::warn!("failed to re-read leaderboard, keeping it in memory: {error}");
            (current.clone(), false)
        }
    };

    match board.insert(entry) {
        Some(rank) => log::info!("new leaderboard entry at rank {rank}"),
        None => log::info!("entry did not survive truncation"),
    }
    if !writable {
        return board;
    }
    if let Err(error) = board.save_to(store) {
        log::warn!("failed to save leaderboard: {error}");
    }
    board
}

/// Milliseconds since the Unix epoch, or zero if the clock is before it.
#[must_use]
pub fn now_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Durable string records addressed by key.
pub trait KeyValueStore {
    /// Returns the record under `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each record as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Platform data directory for this game.
    #[must_use]
    pub fn default_dir() -> PathBuf {
        let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        base.push(APP_DIR_NAME);
        base
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.record_path(key), value)?;
        Ok(())
    }
}

/// Volatile store for tests and `--no-save` style runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.records.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{
        FileStore, KeyValueStore, LEADERBOARD_KEY, Leaderboard, LeaderboardEntry, MemoryStore,
        PlayerName, submit_entry,
    };
    use crate::error::{NameError, StoreError};

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            name: PlayerName::parse(name).expect("test names are valid"),
            score,
            timestamp: 1_700_000_000_000,
        }
    }

    fn full_board(lowest: u32) -> Leaderboard {
        let entries = (0..10).map(|i| entry("AAA", lowest + i * 10)).collect();
        Leaderboard::from_entries(entries, 10)
    }

    #[test]
    fn player_name_validation() {
        assert_eq!(PlayerName::parse("ab").map(|n| n.to_string()), Ok("AB".to_owned()));
        assert_eq!(PlayerName::parse(""), Err(NameError::Empty));
        assert_eq!(PlayerName::parse("ABCD"), Err(NameError::TooLong(4)));
        assert_eq!(PlayerName::parse("A1"), Err(NameError::NotAlphabetic('1')));
    }

    #[test]
    fn zero_never_qualifies() {
        assert!(!Leaderboard::new(10).qualifies(0));
    }

    #[test]
    fn any_positive_score_qualifies_with_room() {
        let board = Leaderboard::from_entries(vec![entry("ZED", 500)], 10);

        assert!(board.qualifies(1));
        assert_eq!(board.potential_rank(1), Some(2));
        assert_eq!(board.potential_rank(600), Some(1));
    }

    #[test]
    fn full_board_requires_beating_the_lowest() {
        let board = full_board(40);

        assert!(!board.qualifies(40));
        assert!(board.qualifies(41));
        assert_eq!(board.potential_rank(40), None);
    }

    #[test]
    fn insert_keeps_descending_order_and_capacity() {
        let mut board = full_board(40);

        let rank = board.insert(entry("NEW", 75));

        assert_eq!(rank, Some(7));
        assert_eq!(board.len(), 10);
        assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(board.entries().last().map(|e| e.score), Some(50));
    }

    #[test]
    fn ties_keep_the_earlier_entry_ahead() {
        let mut board = Leaderboard::from_entries(vec![entry("OLD", 100)], 10);

        board.insert(entry("NEW", 100));

        assert_eq!(board.entries()[0].name.as_str(), "OLD");
        assert_eq!(board.entries()[1].name.as_str(), "NEW");
    }

    #[test]
    fn missing_record_loads_empty() {
        let store = MemoryStore::new();

        assert!(Leaderboard::load_from(&store, 10).is_empty());
    }

    #[test]
    fn malformed_record_loads_empty() {
        let mut store = MemoryStore::new();
        store
            .set(LEADERBOARD_KEY, "not-json")
            .expect("memory store never fails");

        assert!(Leaderboard::load_from(&store, 10).is_empty());
    }

    #[test]
    fn invalid_entries_are_dropped_on_load() {
        let mut store = MemoryStore::new();
        let raw = r#"[
            {"name": "AB", "score": 20, "timestamp": 1},
            {"name": "TOOLONG", "score": 90, "timestamp": 2},
            {"name": "CAT", "score": 70, "timestamp": 3},
            {"score": 10}
        ]"#;
        store.set(LEADERBOARD_KEY, raw).expect("memory store never fails");

        let board = Leaderboard::load_from(&store, 10);

        let names: Vec<&str> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["CAT", "AB"]);
    }

    #[test]
    fn submit_entry_persists_sorted_board() {
        let mut store = MemoryStore::new();
        let empty = Leaderboard::new(3);
        submit_entry(&mut store, &empty, entry("AAA", 10));
        submit_entry(&mut store, &empty, entry("BBB", 30));
        submit_entry(&mut store, &empty, entry("CCC", 20));
        let board = submit_entry(&mut store, &empty, entry("DDD", 5));

        let reloaded = Leaderboard::load_from(&store, 3);
        assert_eq!(board, reloaded);
        let scores: Vec<u32> = reloaded.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 20, 10]);
    }

    /// Holds a record it can no longer read back.
    struct UnreadableStore {
        record: String,
        writes: usize,
    }

    impl KeyValueStore for UnreadableStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked").into())
        }

        fn set(&mut self, _key: &str, value: &str) -> Result<(), StoreError> {
            self.record = value.to_owned();
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn unreadable_store_is_never_overwritten() {
        let original = r#"[{"name":"OLD","score":90,"timestamp":1}]"#;
        let mut store = UnreadableStore {
            record: original.to_owned(),
            writes: 0,
        };
        let current = Leaderboard::from_entries(vec![entry("OLD", 90), entry("MID", 40)], 10);

        let board = submit_entry(&mut store, &current, entry("NEW", 60));

        assert_eq!(store.writes, 0);
        assert_eq!(store.record, original);
        let names: Vec<&str> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["OLD", "NEW", "MID"]);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = unique_test_dir("round_trip");
        let mut store = FileStore::new(dir.clone());

        assert_eq!(store.get("absent").expect("missing file is not an error"), None);

        let board = Leaderboard::from_entries(vec![entry("ABC", 42)], 10);
        board.save_to(&mut store).expect("save should succeed");
        let loaded = Leaderboard::load_from(&store, 10);

        assert_eq!(loaded, board);
        cleanup_test_dir(&dir);
    }

    fn unique_test_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("candy-snake-store-tests")
            .join(format!("{label}-{nanos}"))
    }

    fn cleanup_test_dir(dir: &PathBuf) {
        let _ = fs::remove_dir_all(dir);
    }
}
