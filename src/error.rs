use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while driving geogit or parsing its output
#[derive(Debug, Error)]
pub enum GeogitError {
    #[error("Not a geogit repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("geogit command failed: {0}")]
    CommandFailed(String),

    #[error("Cannot resolve reference '{0}'")]
    ReferenceResolution(String),

    #[error("Failed to parse geogit output: {0}")]
    Parse(String),

    #[error("Malformed attribute block: {0}")]
    MalformedAttributeBlock(String),

    #[error("Cannot decode '{value}' as {declared}")]
    ValueParse { value: String, declared: String },

    #[error("Attribute '{0}' does not exist in feature to modify")]
    MissingAttribute(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for geogit operations
pub type Result<T> = std::result::Result<T, GeogitError>;
