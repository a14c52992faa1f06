use serde::{Deserialize, Serialize};

/// A branch or tag resolved from a `show-ref` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Name with its `refs/heads/` or `refs/tags/` prefix stripped.
    pub name: String,
    pub id: String,
}

/// A configured remote from a `remote list -v` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// Node kind of an `ls-tree` row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Tree,
    Feature,
}

/// One row of an `ls-tree -v` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub kind: NodeKind,
    pub path: String,
}
