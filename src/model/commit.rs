use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::DiffEntry;

/// One commit reconstructed from the engine's metadata block.
///
/// Only the first parent is retained; root commits have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub tree: String,
    pub parent: Option<String>,
    /// Possibly multi-line; continuation lines are joined with `\n`.
    pub message: String,
    pub author: String,
    pub author_date: DateTime<Utc>,
    pub committer: String,
    pub committer_date: DateTime<Utc>,
}

impl Commit {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A log entry: one commit plus the paths it changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub commit: Commit,
    pub changes: Vec<DiffEntry>,
}
