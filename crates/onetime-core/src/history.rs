//! Saved snippets, newest first, capped at [`HISTORY_LIMIT`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::StoreError;
use crate::json_file;

/// Maximum number of entries kept on disk.
pub const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub text: String,
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: DateTime<Utc>,
}

/// Always three fractional digits, `2026-01-02T03:04:05.000Z`.
fn serialize_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Owns `history.json`.
///
/// Every operation re-reads the whole file before mutating it and performs
/// no locking of its own; callers serialize access.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub const FILE_NAME: &'static str = "history.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Vec<HistoryEntry> {
        let Some(value) = json_file::read(&self.path) else {
            return Vec::new();
        };
        let Value::Array(items) = value else {
            warn!("⚠️  {} is not a list, starting empty", self.path.display());
            return Vec::new();
        };

        let mut entries: Vec<HistoryEntry> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<HistoryEntry>(item) {
                Ok(entry) if !entry.text.is_empty() => Some(entry),
                Ok(entry) => {
                    warn!("⚠️  Skipping empty history entry {}", entry.id);
                    None
                }
                Err(e) => {
                    warn!("⚠️  Skipping malformed history entry: {}", e);
                    None
                }
            })
            .collect();
        entries.truncate(HISTORY_LIMIT);
        entries
    }

    /// Prepend `text` as a new entry. Whitespace-only text is ignored and the
    /// current list is returned untouched; otherwise the text is stored as is.
    pub fn append(&self, text: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        self.append_at(text, Utc::now())
    }

    pub fn append_at(
        &self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut entries = self.load();
        if text.trim().is_empty() {
            return Ok(entries);
        }

        let entry = HistoryEntry {
            id: next_id(&entries, now),
            text: text.to_string(),
            created_at: now.trunc_subsecs(3),
        };
        debug!("Saving history entry {} ({} chars)", entry.id, text.chars().count());

        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);
        json_file::write(&self.path, &entries)?;
        Ok(entries)
    }

    /// Drop the entry with `id`. Absent ids leave the file alone.
    pub fn remove(&self, id: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut entries = self.load();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);

        if entries.len() != before {
            json_file::write(&self.path, &entries)?;
        }
        Ok(entries)
    }
}

/// Millisecond timestamp, bumped past every numeric id already stored.
fn next_id(entries: &[HistoryEntry], now: DateTime<Utc>) -> String {
    let candidate = now.timestamp_millis();
    let newest = entries
        .iter()
        .filter_map(|entry| entry.id.parse::<i64>().ok())
        .max();

    match newest {
        Some(newest) if newest >= candidate => (newest + 1).to_string(),
        _ => candidate.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        assert!(HistoryStore::in_dir(dir.path()).load().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());

        std::fs::write(store.path(), "[{\"id\":").unwrap();
        assert!(store.load().is_empty());

        std::fs::write(store.path(), "{\"id\": \"1\"}").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());
        std::fs::write(
            store.path(),
            r#"[
                {"id": "2", "text": "kept", "createdAt": "2026-01-02T03:04:05.678Z"},
                {"id": "1", "text": 42, "createdAt": "2026-01-02T03:04:05.000Z"},
                {"id": "0", "text": "", "createdAt": "2026-01-02T03:04:05.000Z"}
            ]"#,
        )
        .unwrap();

        let entries = store.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "kept");
    }

    #[test]
    fn test_append_prepends_untrimmed_text() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());

        store.append_at("first", at(1_000)).unwrap();
        let entries = store.append_at("  second\n", at(2_000)).unwrap();

        assert_eq!(entries[0].text, "  second\n");
        assert_eq!(entries[1].text, "first");
        assert_eq!(store.load(), entries);
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());
        store.append_at("keep", at(1_000)).unwrap();

        let before = store.load();
        assert_eq!(store.append("   \n\t").unwrap(), before);
        assert_eq!(store.append("").unwrap(), before);
        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_ids_are_unique_within_the_same_instant() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());

        store.append_at("a", at(5_000)).unwrap();
        store.append_at("b", at(5_000)).unwrap();
        let entries = store.append_at("c", at(4_000)).unwrap();

        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["5002", "5001", "5000"]);
    }

    #[test]
    fn test_created_at_is_millisecond_iso() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());
        let now = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        store.append_at("x", now).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"createdAt\": \"2023-11-14T22:13:20.123Z\""));
    }

    #[test]
    fn test_whole_second_keeps_millisecond_digits() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());
        let entries = store.append_at("x", at(1_700_000_000_000)).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"createdAt\": \"2023-11-14T22:13:20.000Z\""));

        let value = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(value["createdAt"], "2023-11-14T22:13:20.000Z");
        assert_eq!(store.load(), entries);
    }

    #[test]
    fn test_cap_keeps_most_recent_by_insertion() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());

        // Timestamps run backwards so only insertion order can explain the result.
        for i in 0..(HISTORY_LIMIT + 5) {
            let entries = store
                .append_at(&format!("note {i}"), at(1_000_000 - i as i64))
                .unwrap();
            assert!(entries.len() <= HISTORY_LIMIT);
        }

        let entries = store.load();
        assert_eq!(entries.len(), HISTORY_LIMIT);
        assert_eq!(entries[0].text, format!("note {}", HISTORY_LIMIT + 4));
        assert_eq!(entries[HISTORY_LIMIT - 1].text, "note 5");
    }

    #[test]
    fn test_oversized_file_is_truncated_on_load() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());
        let entries: Vec<HistoryEntry> = (0..150)
            .map(|i| HistoryEntry {
                id: i.to_string(),
                text: format!("t{i}"),
                created_at: at(i),
            })
            .collect();
        json_file::write(store.path(), &entries).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), HISTORY_LIMIT);
        assert_eq!(loaded[0].text, "t0");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path());
        store.append_at("a", at(1_000)).unwrap();
        let entries = store.append_at("b", at(2_000)).unwrap();

        let after = store.remove(&entries[1].id).unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].text, "b");

        assert_eq!(store.remove("missing").unwrap(), after);
        assert_eq!(store.remove(&entries[1].id).unwrap(), after);
        assert_eq!(store.load(), after);
    }
}
