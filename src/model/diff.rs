use serde::{Deserialize, Serialize};

/// Classification derived from a diff entry's two content refs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

/// One changed path from a `diff-tree` report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub path: String,
    /// Content ref before the change; empty for additions.
    pub old_ref: String,
    /// Content ref after the change; empty for removals.
    pub new_ref: String,
}

impl DiffEntry {
    pub fn change_type(&self) -> ChangeType {
        if self.old_ref.is_empty() {
            ChangeType::Added
        } else if self.new_ref.is_empty() {
            ChangeType::Removed
        } else {
            ChangeType::Modified
        }
    }
}

/// The three content refs of one conflicted path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub ancestor: String,
    pub ours: String,
    pub theirs: String,
}

/// Provenance of one attribute from a blame porcelain report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameEntry {
    /// Current value, as raw text.
    pub value: String,
    /// Revision that last set the attribute.
    pub commit: String,
    pub author: String,
}

/// Old/new value texts of one attribute from a `--describe` feature diff.
///
/// `old` is absent for additions, `new` is absent for removals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDiff {
    pub old: Option<String>,
    pub new: Option<String>,
}
