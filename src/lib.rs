pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod repository;

/// The current branch head.
pub const HEAD: &str = "HEAD";
/// The working tree snapshot.
pub const WORK_HEAD: &str = "WORK_HEAD";
/// The staging area snapshot.
pub const STAGE_HEAD: &str = "STAGE_HEAD";

// Re-export commonly used types for convenience
pub use cli::{CliExecutor, CommandRunner, GeogitVersion};
pub use error::{GeogitError, Result};
pub use model::{
    AttributeDiff, BlameEntry, ChangeType, Child, Commit, Commitish, Conflict, Coord, DiffEntry,
    Feature, FeatureVersion, Geometry, LogEntry, NamedRef, Remote, Tree,
};
pub use parser::attributes::{Attribute, Attributes};
pub use parser::value::{AttributeType, Value};
pub use repository::{Repository, ResetMode};
