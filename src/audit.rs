use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Append-only log of every geogit invocation
#[derive(Debug)]
pub struct CommandLog {
    log_path: PathBuf,
}

impl CommandLog {
    /// Create a CommandLog at the default location
    pub fn new() -> io::Result<Self> {
        Self::with_path(Self::default_log_path()?)
    }

    /// Create a CommandLog with a custom log path
    pub fn with_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let log_path = path.as_ref().to_path_buf();

        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { log_path })
    }

    /// Default log path: ~/.config/geogit-client/commands.log
    fn default_log_path() -> io::Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|_| {
            io::Error::new(io::ErrorKind::NotFound, "HOME environment variable not set")
        })?;

        Ok(PathBuf::from(home)
            .join(".config")
            .join("geogit-client")
            .join("commands.log"))
    }

    /// Record one command invocation
    pub fn record(
        &self,
        program: &str,
        args: &[String],
        workdir: &Path,
        exit_code: i32,
    ) -> io::Result<()> {
        self.rotate_if_needed()?;

        let timestamp = Utc::now().to_rfc3339();
        let entry = format!(
            "[{}] [{}] [exit:{}] {} {}\n",
            timestamp,
            workdir.display(),
            exit_code,
            program,
            args.join(" ")
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        file.write_all(entry.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Rotate the log file if it exceeds MAX_LOG_SIZE
    fn rotate_if_needed(&self) -> io::Result<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        let metadata = fs::metadata(&self.log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            // commands.log -> commands.log.1
            let backup_path = self.log_path.with_extension("log.1");
            fs::rename(&self.log_path, backup_path)?;
        }

        Ok(())
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
