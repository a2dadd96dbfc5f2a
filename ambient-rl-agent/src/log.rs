//! Bounded append-only transition log
//!
//! Persisted as a single JSON array document per update, the same layout
//! the original deployment wrote, so an existing log file loads as-is.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use tracing::warn;

use ambient_rl_core::{Result, Transition};

/// FIFO-bounded record of applied updates
#[derive(Debug, Clone)]
pub struct TransitionLog {
    entries: VecDeque<Transition>,
    capacity: usize,
}

impl TransitionLog {
    /// Create an empty log evicting past `capacity` entries
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Load the log at `path`, discarding anything malformed
    ///
    /// A missing file is an empty log. A document that is not a JSON array
    /// is discarded with a warning; individually malformed entries are
    /// skipped while the rest are kept.
    #[must_use]
    pub fn load(path: &Path, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return log,
        };
        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn!(path = %path.display(), %err, "discarding malformed transition log");
                return log;
            }
        };
        let total = values.len();
        for value in values {
            match serde_json::from_value::<Transition>(value) {
                Ok(entry) => log.push(entry),
                Err(err) => warn!(%err, "skipping malformed transition record"),
            }
        }
        if log.len() < total {
            warn!(
                kept = log.len(),
                total, "transition log loaded with records dropped"
            );
        }
        log
    }

    /// Append a record, evicting the oldest past capacity
    ///
    /// A zero-capacity log retains nothing.
    pub fn push(&mut self, entry: Transition) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Number of retained records
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate records oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.entries.iter()
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Write the whole log to `path` via a temp file and atomic rename
    pub fn persist(&self, path: &Path) -> Result<()> {
        let entries: Vec<&Transition> = self.entries.iter().collect();
        let encoded = serde_json::to_string_pretty(&entries)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
