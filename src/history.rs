//! Append-only JSONL history of exchanges.
//!
//! Every completed run appends exactly one [`ExchangeRecord`] as one JSON
//! line. Conversation continuity is a pure function of the *last* record:
//! [`HistoryStore::last_response_id`] reads only the final non-empty line and
//! returns its continuation handle. Records are never edited or deleted.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One logged request/response turn with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRecord {
    /// UTC timestamp of the exchange.
    pub ts: DateTime<Utc>,
    /// Model identifier the exchange was made with.
    pub model: String,
    /// The question sent to the service.
    pub request: String,
    /// The answer the service produced.
    pub response: String,
    /// Opaque continuation handle issued by the service for this exchange.
    /// Passing it back on the next call continues the server-side thread.
    pub response_id: Option<String>,
    /// Usage metrics as reported by the service, kept opaque.
    pub usage: Option<serde_json::Value>,
}

/// Line-delimited JSON store of [`ExchangeRecord`]s.
///
/// Single-writer, single-process: the invoking pipeline serializes runs, so
/// no locking is performed here.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Continuation handle for the next call: the `response_id` of the last
    /// record, if any.
    ///
    /// An absent store, an empty store, and an unparsable last line all
    /// degrade to `None` (fresh thread) rather than failing the run. The log
    /// lines distinguish "absent" from "present but unreadable" so a masked
    /// read failure is at least visible to the operator.
    pub fn last_response_id(&self) -> Option<String> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No history at {}, starting a fresh thread", self.path.display());
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    "History at {} is unreadable ({}), starting a fresh thread",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        let last = contents.lines().rev().find(|line| !line.trim().is_empty())?;

        match serde_json::from_str::<ExchangeRecord>(last) {
            Ok(record) => record.response_id,
            Err(e) => {
                tracing::warn!(
                    "Last history line in {} is unparsable ({}), starting a fresh thread",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Append one record as a single line, creating the file and its parent
    /// directory on first use. Append is the only write mode; prior lines
    /// are never rewritten.
    pub fn append(&self, record: &ExchangeRecord) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut line = serde_json::to_string(record).map_err(std::io::Error::other)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn record(request: &str, response: &str, response_id: Option<&str>) -> ExchangeRecord {
        ExchangeRecord {
            ts: Utc::now(),
            model: "test-model".to_string(),
            request: request.to_string(),
            response: response.to_string(),
            response_id: response_id.map(str::to_string),
            usage: None,
        }
    }

    #[test]
    fn absent_store_yields_no_continuation() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("missing.jsonl"));
        assert_eq!(store.last_response_id(), None);
    }

    #[test]
    fn empty_store_yields_no_continuation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        std::fs::write(&path, "").unwrap();
        let store = HistoryStore::new(path);
        assert_eq!(store.last_response_id(), None);
    }

    #[test]
    fn append_then_resolve_round_trips_the_handle() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.jsonl"));

        store.append(&record("q", "a", Some("resp_42"))).unwrap();

        assert_eq!(store.last_response_id(), Some("resp_42".to_string()));
    }

    #[test]
    fn only_the_last_record_decides_the_handle() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.jsonl"));

        store.append(&record("q1", "a1", Some("first"))).unwrap();
        store.append(&record("q2", "a2", Some("second"))).unwrap();
        store.append(&record("q3", "a3", Some("third"))).unwrap();

        assert_eq!(store.last_response_id(), Some("third".to_string()));
    }

    #[test]
    fn last_record_without_handle_yields_none() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.jsonl"));

        store.append(&record("q1", "a1", Some("first"))).unwrap();
        store.append(&record("q2", "a2", None)).unwrap();

        assert_eq!(store.last_response_id(), None);
    }

    #[test]
    fn corrupt_last_line_degrades_to_fresh_thread() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let store = HistoryStore::new(&path);

        store.append(&record("q", "a", Some("resp_1"))).unwrap();
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str("{\"truncated\": tru");
        std::fs::write(&path, contents).unwrap();

        assert_eq!(store.last_response_id(), None);
    }

    #[test]
    fn trailing_blank_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let store = HistoryStore::new(&path);

        store.append(&record("q", "a", Some("resp_9"))).unwrap();
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str("\n  \n");
        std::fs::write(&path, contents).unwrap();

        assert_eq!(store.last_response_id(), Some("resp_9".to_string()));
    }

    #[test]
    fn append_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history").join("history.jsonl");
        let store = HistoryStore::new(&path);

        store.append(&record("q", "a", None)).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn appends_one_line_per_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let store = HistoryStore::new(&path);

        store.append(&record("q1", "a1", Some("r1"))).unwrap();
        store.append(&record("q2", "a2", Some("r2"))).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);

        // Each line is a self-contained record.
        let first: ExchangeRecord = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(first.request, "q1");
        assert_eq!(first.response_id, Some("r1".to_string()));
    }
}
