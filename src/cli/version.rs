use crate::error::{GeogitError, Result};
use std::process::Command;

/// Minimum required geogit version
const MIN_GEOGIT_VERSION: (u32, u32) = (1, 0);

/// Represents a geogit version
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GeogitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GeogitVersion {
    /// Detect the installed geogit version
    pub fn detect(program: &str) -> Result<Self> {
        let output = Command::new(program)
            .arg("--version")
            .output()
            .map_err(|e| {
                GeogitError::CommandFailed(format!("Failed to execute {}: {}", program, e))
            })?;

        if !output.status.success() {
            return Err(GeogitError::CommandFailed(format!(
                "{} --version command failed",
                program
            )));
        }

        let version_string = String::from_utf8_lossy(&output.stdout);
        Self::parse(&version_string)
    }

    /// Parse a version report like "geogit version 1.2.0"
    pub fn parse(version_str: &str) -> Result<Self> {
        let parts: Vec<&str> = version_str.split_whitespace().collect();

        if parts.len() < 3 || parts[0] != "geogit" || parts[1] != "version" {
            return Err(GeogitError::Parse(format!(
                "Unexpected geogit version format: {}",
                version_str
            )));
        }

        let nums: Vec<&str> = parts[2].split('.').collect();
        if nums.len() < 2 {
            return Err(GeogitError::Parse(format!(
                "Invalid version number format: {}",
                parts[2]
            )));
        }

        let major = nums[0]
            .parse::<u32>()
            .map_err(|_| GeogitError::Parse(format!("Invalid major version: {}", nums[0])))?;

        let minor = nums[1]
            .parse::<u32>()
            .map_err(|_| GeogitError::Parse(format!("Invalid minor version: {}", nums[1])))?;

        // snapshot suffixes like "1.0.0-RC3" reduce to zero
        let patch = if nums.len() >= 3 {
            nums[2].parse::<u32>().unwrap_or(0)
        } else {
            0
        };

        Ok(GeogitVersion {
            major,
            minor,
            patch,
        })
    }

    /// Check if this version meets minimum requirements
    pub fn is_supported(&self) -> bool {
        self.major > MIN_GEOGIT_VERSION.0
            || (self.major == MIN_GEOGIT_VERSION.0 && self.minor >= MIN_GEOGIT_VERSION.1)
    }
}

impl std::fmt::Display for GeogitVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
