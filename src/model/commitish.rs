use crate::error::{GeogitError, Result};
use crate::model::{Commit, DiffEntry, LogEntry, Tree};
use crate::repository::Repository;

/// A reference expression (branch, tag, hash, `HEAD~2`, ...) bound to a
/// repository.
///
/// The expression resolves lazily: nothing is looked up until a query
/// method runs, and every query reflects the repository at that moment.
#[derive(Debug, Clone)]
pub struct Commitish<'r> {
    repo: &'r Repository,
    refspec: String,
}

impl<'r> Commitish<'r> {
    pub fn new<S: Into<String>>(repo: &'r Repository, refspec: S) -> Self {
        Self {
            repo,
            refspec: refspec.into(),
        }
    }

    pub fn refspec(&self) -> &str {
        &self.refspec
    }

    /// Resolve to the 40-character commit id
    pub fn id(&self) -> Result<String> {
        self.repo.revparse(&self.refspec)
    }

    /// The commit this expression currently points at
    pub fn commit(&self) -> Result<Commit> {
        let entries = self.repo.log(&self.refspec, None)?;
        entries
            .into_iter()
            .next()
            .map(|entry| entry.commit)
            .ok_or_else(|| GeogitError::Parse(format!("no commits at '{}'", self.refspec)))
    }

    /// The first parent, as another lazy reference
    pub fn parent(&self) -> Commitish<'r> {
        Commitish::new(self.repo, format!("{}~1", self.refspec))
    }

    /// The root tree of this revision
    pub fn root(&self) -> Tree<'r> {
        Tree::root(self.repo, self.refspec.clone())
    }

    /// History reachable from this reference, newest first
    pub fn log(&self) -> Result<Vec<LogEntry>> {
        self.repo.log(&self.refspec, None)
    }

    /// Paths changed between this reference and `other`
    pub fn diff_to(&self, other: &str) -> Result<Vec<DiffEntry>> {
        self.repo.diff(&self.refspec, other)
    }
}
