use crate::audit::CommandLog;
use crate::error::{GeogitError, Result};
use std::path::Path;
use std::process::Command;

/// Captured output of one geogit invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Everything the process printed, stdout first, then stderr.
    pub lines: Vec<String>,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// The seam between the command façade and the external geogit process.
///
/// Implementations run one command to completion in the given working
/// directory and return every line it printed. A non-zero exit status
/// surfaces as [`GeogitError::CommandFailed`] carrying the captured output.
pub trait CommandRunner: Send + Sync {
    fn run(&self, workdir: &Path, args: &[String]) -> Result<Vec<String>>;
}

/// Runs the geogit executable as a blocking subprocess
#[derive(Debug)]
pub struct CliExecutor {
    program: String,
    audit: Option<CommandLog>,
}

impl CliExecutor {
    /// Create an executor for the `geogit` binary found on PATH
    pub fn new() -> Self {
        Self::with_program("geogit")
    }

    /// Create an executor for a specific geogit binary
    pub fn with_program<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            audit: None,
        }
    }

    /// Record every invocation in the given command log
    pub fn with_audit(mut self, log: CommandLog) -> Self {
        self.audit = Some(log);
        self
    }

    /// Get the configured program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Spawn the process and drain it to end-of-stream
    fn spawn(&self, workdir: &Path, args: &[String]) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(GeogitError::CommandFailed("Empty command".to_string()));
        }

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(workdir)
            .output()
            .map_err(|e| {
                GeogitError::CommandFailed(format!("Failed to execute {}: {}", self.program, e))
            })?;

        let mut lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect();
        lines.extend(
            String::from_utf8_lossy(&output.stderr)
                .lines()
                .map(str::to_string),
        );

        Ok(CommandOutput {
            lines,
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

impl Default for CliExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for CliExecutor {
    fn run(&self, workdir: &Path, args: &[String]) -> Result<Vec<String>> {
        let output = self.spawn(workdir, args)?;

        if let Some(log) = &self.audit {
            // an unwritable audit log must not mask the command result
            let _ = log.record(&self.program, args, workdir, output.exit_code);
        }

        if !output.success() {
            return Err(GeogitError::CommandFailed(output.lines.join("\n")));
        }

        Ok(output.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_captures_stdout_lines() {
        let temp = TempDir::new().unwrap();
        let executor = CliExecutor::with_program("echo");

        let lines = executor.run(temp.path(), &argv(&["hello", "world"])).unwrap();
        assert_eq!(lines, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_nonzero_exit_is_command_failed() {
        let temp = TempDir::new().unwrap();
        let executor = CliExecutor::with_program("false");

        let result = executor.run(temp.path(), &argv(&["anything"]));
        assert!(matches!(result, Err(GeogitError::CommandFailed(_))));
    }

    #[test]
    fn test_failure_carries_captured_output() {
        let temp = TempDir::new().unwrap();
        let executor = CliExecutor::with_program("ls");

        let result = executor.run(temp.path(), &argv(&["definitely-not-here-zzz"]));
        match result {
            Err(GeogitError::CommandFailed(message)) => {
                assert!(message.contains("definitely-not-here-zzz"));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_program() {
        let temp = TempDir::new().unwrap();
        let executor = CliExecutor::with_program("no-such-binary-zzz");

        let result = executor.run(temp.path(), &argv(&["--version"]));
        assert!(matches!(result, Err(GeogitError::CommandFailed(_))));
    }

    #[test]
    fn test_empty_command() {
        let temp = TempDir::new().unwrap();
        let executor = CliExecutor::new();

        let result = executor.run(temp.path(), &[]);
        assert!(matches!(result, Err(GeogitError::CommandFailed(_))));
    }

    #[test]
    fn test_audit_records_invocation() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join("commands.log");
        let log = CommandLog::with_path(&log_path).unwrap();
        let executor = CliExecutor::with_program("echo").with_audit(log);

        executor.run(temp.path(), &argv(&["status"])).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("echo status"));
        assert!(content.contains("[exit:0]"));
    }
}
