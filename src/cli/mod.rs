pub mod executor;
pub mod version;

// Re-export commonly used types
pub use executor::{CliExecutor, CommandOutput, CommandRunner};
pub use version::GeogitVersion;
