//! Feedback store - bounded persistence for feedback records and the golden set
//!
//! Two named JSON collections under the data directory: `feedback.json` holds
//! the raw record list, `golden_set.json` the curated entries. Every write
//! replaces the whole collection through a temp file and rename, so a
//! concurrent reader never observes a partial write.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::types::{FeedbackRecord, GoldenSetEntry};

/// Hard cap on stored feedback records; inserts beyond it evict oldest first
pub const MAX_RECORDS: usize = 1000;

/// Persistent feedback store backed by JSON files
pub struct FeedbackStore {
    base_dir: PathBuf,
}

impl FeedbackStore {
    /// Create a store at the default data location
    pub fn new() -> anyhow::Result<Self> {
        let base_dir = crate::config::data_dir()?.join("feedback");
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Create with a custom base directory
    pub fn with_dir(base_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Append one record, evicting the oldest records past the cap
    ///
    /// Returns the stored record count after the insert.
    pub fn append(&self, record: FeedbackRecord) -> Result<usize> {
        let mut records = self.load_all()?;
        records.push(record);
        if records.len() > MAX_RECORDS {
            let excess = records.len() - MAX_RECORDS;
            records.drain(..excess);
            debug!("Feedback store at capacity, evicted {} oldest records", excess);
        }
        self.write_collection(&self.feedback_path(), &records)?;
        Ok(records.len())
    }

    /// Load all stored records; empty if none persisted yet
    pub fn load_all(&self) -> Result<Vec<FeedbackRecord>> {
        self.read_collection(&self.feedback_path())
    }

    /// Atomically overwrite the full record collection
    pub fn replace_all(&self, records: &[FeedbackRecord]) -> Result<()> {
        self.write_collection(&self.feedback_path(), &records)
    }

    /// Atomically overwrite the curated golden set
    pub fn save_golden_set(&self, entries: &[GoldenSetEntry]) -> Result<()> {
        self.write_collection(&self.golden_set_path(), &entries)
    }

    /// Load the current golden set; empty if none curated yet
    pub fn load_golden_set(&self) -> Result<Vec<GoldenSetEntry>> {
        self.read_collection(&self.golden_set_path())
    }

    /// Base directory holding both collections
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    // --- File I/O ---

    fn feedback_path(&self) -> PathBuf {
        self.base_dir.join("feedback.json")
    }

    fn golden_set_path(&self) -> PathBuf {
        self.base_dir.join("golden_set.json")
    }

    fn write_collection<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    fn read_collection<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
