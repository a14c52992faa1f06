use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use geogit::cli::CommandRunner;
use geogit::{GeogitError, Repository, Result};
use tempfile::TempDir;

/// One canned exchange with the fake engine
struct Exchange {
    args: Vec<String>,
    lines: Vec<String>,
    exit_code: i32,
}

/// A `CommandRunner` that replays scripted engine output and checks the
/// argv the façade builds for each operation.
#[derive(Clone)]
pub struct ScriptedRunner {
    exchanges: Arc<Mutex<VecDeque<Exchange>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self {
            exchanges: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Queue a successful exchange
    pub fn expect(&self, args: &[&str], lines: &[&str]) {
        self.push(args, lines, 0);
    }

    /// Queue a failing exchange
    pub fn expect_failure(&self, args: &[&str], lines: &[&str]) {
        self.push(args, lines, 1);
    }

    fn push(&self, args: &[&str], lines: &[&str], exit_code: i32) {
        self.exchanges.lock().unwrap().push_back(Exchange {
            args: args.iter().map(|arg| arg.to_string()).collect(),
            lines: lines.iter().map(|line| line.to_string()).collect(),
            exit_code,
        });
    }

    /// Assert every queued exchange was consumed
    pub fn assert_drained(&self) {
        assert!(
            self.exchanges.lock().unwrap().is_empty(),
            "scripted exchanges left unconsumed"
        );
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, _workdir: &Path, args: &[String]) -> Result<Vec<String>> {
        let exchange = self
            .exchanges
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command: {:?}", args));

        assert_eq!(exchange.args, args, "façade built unexpected argv");

        if exchange.exit_code != 0 {
            return Err(GeogitError::CommandFailed(exchange.lines.join("\n")));
        }
        Ok(exchange.lines)
    }
}

/// Create an on-disk working copy skeleton with a `.geogit` directory
pub fn fake_working_copy() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().to_path_buf();

    fs::create_dir_all(path.join(".geogit")).unwrap();
    fs::write(path.join(".geogit").join("HEAD"), "ref: refs/heads/master\n").unwrap();

    (temp, path)
}

/// Open a repository over a fresh scripted runner
pub fn scripted_repository() -> (TempDir, Repository, ScriptedRunner) {
    let (temp, path) = fake_working_copy();
    let runner = ScriptedRunner::new();
    let repo = Repository::with_runner(&path, Box::new(runner.clone())).unwrap();
    (temp, repo, runner)
}
