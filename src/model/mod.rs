pub mod commit;
pub mod commitish;
pub mod diff;
pub mod feature;
pub mod geometry;
pub mod refs;
pub mod tree;

// Re-export commonly used types
pub use commit::{Commit, LogEntry};
pub use commitish::Commitish;
pub use diff::{AttributeDiff, BlameEntry, ChangeType, Conflict, DiffEntry};
pub use feature::{Feature, FeatureVersion};
pub use geometry::{Coord, Geometry, WktError};
pub use refs::{NamedRef, NodeKind, Remote, TreeEntry};
pub use tree::{Child, Tree};
