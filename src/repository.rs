use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::audit::CommandLog;
use crate::cli::{CliExecutor, CommandRunner};
use crate::config::Config;
use crate::error::{GeogitError, Result};
use crate::model::{
    AttributeDiff, BlameEntry, Child, Commitish, Conflict, DiffEntry, Feature, FeatureVersion,
    LogEntry, NamedRef, NodeKind, Remote, Tree,
};
use crate::parser;
use crate::parser::attributes::Attributes;
use crate::parser::refs::{BRANCH_PREFIX, TAG_PREFIX};
use crate::parser::value::Value;
use crate::{HEAD, STAGE_HEAD, WORK_HEAD};

/// How `reset` moves the working tree and staging area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    Hard,
    Mixed,
    Soft,
}

impl ResetMode {
    fn flag(self) -> &'static str {
        match self {
            ResetMode::Hard => "--hard",
            ResetMode::Mixed => "--mixed",
            ResetMode::Soft => "--soft",
        }
    }
}

/// A geogit working copy driven through the external CLI.
///
/// Every query spawns one engine process, drains its output and
/// reconstructs fresh domain objects; nothing is cached or mutated in
/// place. One instance must not be used concurrently, but two instances
/// over two working copies are independent.
pub struct Repository {
    path: PathBuf,
    runner: Box<dyn CommandRunner>,
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open an existing working copy, validating its `.geogit` directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_runner(path, Box::new(CliExecutor::new()))
    }

    /// Open a working copy using settings from a client [`Config`]
    pub fn with_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<Self> {
        let mut executor = CliExecutor::with_program(config.geogit.program.clone());
        if config.audit.log_commands {
            let log = match &config.audit.log_path {
                Some(log_path) => CommandLog::with_path(log_path)?,
                None => CommandLog::new()?,
            };
            executor = executor.with_audit(log);
        }
        Self::with_runner(path, Box::new(executor))
    }

    /// Open a working copy over an explicit execution collaborator
    pub fn with_runner<P: AsRef<Path>>(path: P, runner: Box<dyn CommandRunner>) -> Result<Self> {
        let repo = Self {
            path: path.as_ref().to_path_buf(),
            runner,
        };
        repo.check_is_repo()?;
        Ok(repo)
    }

    /// Create a new repository at `path`, creating the directory if needed
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init_with_runner(path, Box::new(CliExecutor::new()))
    }

    pub fn init_with_runner<P: AsRef<Path>>(
        path: P,
        runner: Box<dyn CommandRunner>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)?;
        let repo = Self { path, runner };
        repo.run(argv(&["init"]))?;
        Ok(repo)
    }

    /// Clone `url` into `dest` and open the resulting working copy
    pub fn clone_from<P: AsRef<Path>>(url: &str, dest: P) -> Result<Self> {
        let dest = dest.as_ref();
        let executor = CliExecutor::new();
        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        executor.run(
            parent,
            &[
                "clone".to_string(),
                url.to_string(),
                dest.display().to_string(),
            ],
        )?;
        Self::with_runner(dest, Box::new(executor))
    }

    /// The working copy location
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_is_repo(&self) -> Result<()> {
        if !self.path.join(".geogit").exists() {
            return Err(GeogitError::NotARepository(self.path.clone()));
        }
        Ok(())
    }

    /// Run one engine command in this working copy
    fn run(&self, args: Vec<String>) -> Result<Vec<String>> {
        self.runner.run(&self.path, &args)
    }

    // ---- reference resolution ----------------------------------------

    /// Resolve any reference expression to its 40-character commit id.
    ///
    /// This is the sole validation gate for identifiers; output of any
    /// other length is a [`GeogitError::ReferenceResolution`].
    pub fn revparse(&self, refspec: &str) -> Result<String> {
        let output = self.run(argv(&["rev-parse", refspec]))?;
        let id = output.first().map(|line| line.trim()).unwrap_or("");
        if id.len() != 40 {
            return Err(GeogitError::ReferenceResolution(refspec.to_string()));
        }
        Ok(id.to_string())
    }

    /// A lazy reference bound to this repository
    pub fn commitish(&self, refspec: &str) -> Commitish<'_> {
        Commitish::new(self, refspec)
    }

    /// The branch currently checked out, read from `.geogit/HEAD`
    pub fn head(&self) -> Result<Commitish<'_>> {
        self.check_is_repo()?;
        let contents = fs::read_to_string(self.path.join(".geogit").join("HEAD"))?;
        let first = contents.lines().next().unwrap_or("").trim();
        let refname = first.rsplit(' ').next().unwrap_or("");
        let branch = refname.strip_prefix(BRANCH_PREFIX).unwrap_or(refname);
        Ok(Commitish::new(self, branch))
    }

    /// Whether an interrupted rebase is in progress
    pub fn is_rebasing(&self) -> Result<bool> {
        self.check_is_repo()?;
        let orig_head = self.path.join(".geogit").join("ORIG_HEAD");
        let branch_file = self
            .path
            .join(".geogit")
            .join("rebase-apply")
            .join("branch");
        Ok(orig_head.exists() && branch_file.exists())
    }

    /// Whether an interrupted merge is in progress
    pub fn is_merging(&self) -> Result<bool> {
        self.check_is_repo()?;
        let orig_head = self.path.join(".geogit").join("ORIG_HEAD");
        let branch_file = self
            .path
            .join(".geogit")
            .join("rebase-apply")
            .join("branch");
        Ok(orig_head.exists() && !branch_file.exists())
    }

    // ---- history ------------------------------------------------------

    /// History reachable from `refspec`, newest first, with changed paths
    pub fn log(&self, refspec: &str, path: Option<&str>) -> Result<Vec<LogEntry>> {
        let mut args = argv(&["rev-list", refspec, "--changed"]);
        if let Some(path) = path {
            args.push("-p".to_string());
            args.push(path.to_string());
        }
        let output = self.run(args)?;
        parser::commit::parse_log(&output)
    }

    /// Paths changed between two revisions
    pub fn diff(&self, old: &str, new: &str) -> Result<Vec<DiffEntry>> {
        let output = self.run(argv(&["diff-tree", old, new]))?;
        parser::diff::parse_diff(&output)
    }

    /// Changes added to the staging area but not yet committed
    pub fn staged(&self) -> Result<Vec<DiffEntry>> {
        self.diff(HEAD, STAGE_HEAD)
    }

    /// Working tree changes not yet added to the staging area
    pub fn unstaged(&self) -> Result<Vec<DiffEntry>> {
        self.diff(STAGE_HEAD, WORK_HEAD)
    }

    /// Attribute-level differences of one feature between two revisions
    pub fn feature_diff(
        &self,
        old: &str,
        new: &str,
        path: &str,
    ) -> Result<BTreeMap<String, AttributeDiff>> {
        let output = self.run(argv(&["diff-tree", old, new, "--", path, "--describe"]))?;
        // the first line repeats the path header
        let body = output.get(1..).unwrap_or_default();
        parser::diff::parse_feature_diff(body)
    }

    /// Unresolved merge conflicts, keyed by path
    pub fn conflicts(&self) -> Result<BTreeMap<String, Conflict>> {
        let output = self.run(argv(&["conflicts", "--refspecs-only"]))?;
        parser::diff::parse_conflicts(&output)
    }

    /// Per-attribute provenance of the feature at `path`
    pub fn blame(&self, path: &str) -> Result<BTreeMap<String, BlameEntry>> {
        let output = self.run(argv(&["blame", path, "--porcelain"]))?;
        parser::diff::parse_blame(&output)
    }

    // ---- trees and features -------------------------------------------

    /// Direct (or recursive) children of a tree node
    pub fn children(
        &self,
        refspec: &str,
        path: Option<&str>,
        recursive: bool,
    ) -> Result<Vec<Child<'_>>> {
        let fullref = match path {
            Some(path) => format!("{}:{}", refspec, path),
            None => refspec.to_string(),
        };
        let mut args = vec!["ls-tree".to_string(), fullref, "-v".to_string()];
        if recursive {
            args.push("-r".to_string());
        }
        let output = self.run(args)?;
        let entries = parser::refs::parse_ls_tree(&output)?;

        Ok(entries
            .into_iter()
            .map(|entry| match entry.kind {
                NodeKind::Tree => Child::Tree(Tree::new(self, refspec, entry.path)),
                NodeKind::Feature => Child::Feature(Feature::new(self, refspec, entry.path)),
            })
            .collect())
    }

    /// Child trees of a tree node
    pub fn trees(&self, refspec: &str, path: Option<&str>) -> Result<Vec<Tree<'_>>> {
        Ok(self
            .children(refspec, path, false)?
            .into_iter()
            .filter_map(|child| match child {
                Child::Tree(tree) => Some(tree),
                Child::Feature(_) => None,
            })
            .collect())
    }

    /// Child features of a tree node
    pub fn features(&self, refspec: &str, path: Option<&str>) -> Result<Vec<Feature<'_>>> {
        Ok(self
            .children(refspec, path, false)?
            .into_iter()
            .filter_map(|child| match child {
                Child::Feature(feature) => Some(feature),
                Child::Tree(_) => None,
            })
            .collect())
    }

    /// A feature handle at (refspec, path); nothing is fetched yet
    pub fn feature(&self, refspec: &str, path: &str) -> Feature<'_> {
        Feature::new(self, refspec, path)
    }

    /// Attribute snapshot of the feature at (refspec, path)
    pub fn feature_data(&self, refspec: &str, path: &str) -> Result<Attributes> {
        let output = self.run(vec![
            "show".to_string(),
            "--raw".to_string(),
            format!("{}:{}", refspec, path),
        ])?;
        // line 0 repeats the refspec, line 1 is the feature id
        let body = output.get(2..).unwrap_or_default();
        parser::attributes::parse_attributes(body)
    }

    /// Attribute snapshots of several features in one engine call
    pub fn features_data(&self, refspecs: &[String]) -> Result<BTreeMap<String, Attributes>> {
        let mut args = argv(&["show", "--raw"]);
        args.extend(refspecs.iter().cloned());
        let output = self.run(args)?;
        parser::feature::parse_feature_collection(&output)
    }

    /// Every historical snapshot of one feature, newest first
    pub fn versions(&self, path: &str) -> Result<Vec<FeatureVersion>> {
        let entries = self.log(HEAD, Some(path))?;
        let mut versions = Vec::new();
        for entry in entries {
            let attributes = self.feature_data(&entry.commit.id, path)?;
            versions.push(FeatureVersion {
                commit: entry.commit,
                attributes,
            });
        }
        Ok(versions)
    }

    // ---- working tree -------------------------------------------------

    /// Check out a revision, or only the given paths from it
    pub fn checkout(&self, refspec: &str, paths: &[&str]) -> Result<()> {
        let mut args = argv(&["checkout", refspec]);
        if !paths.is_empty() {
            args.push("-p".to_string());
            args.extend(paths.iter().map(|path| path.to_string()));
        }
        self.run(args)?;
        Ok(())
    }

    /// Move the current branch head to `refspec`
    pub fn reset(&self, refspec: &str, mode: ResetMode) -> Result<()> {
        self.run(argv(&["reset", refspec, mode.flag()]))?;
        Ok(())
    }

    /// Stage working tree changes, all of them or only the given paths
    pub fn add(&self, paths: &[&str]) -> Result<()> {
        let mut args = argv(&["add"]);
        args.extend(paths.iter().map(|path| path.to_string()));
        self.run(args)?;
        Ok(())
    }

    /// Commit staged changes
    pub fn commit(&self, message: &str, paths: &[&str]) -> Result<()> {
        let mut args = argv(&["commit", "-m", message]);
        args.extend(paths.iter().map(|path| path.to_string()));
        self.run(args)?;
        Ok(())
    }

    // ---- branches and tags --------------------------------------------

    /// All branches as (name, id) pairs
    pub fn branches(&self) -> Result<Vec<NamedRef>> {
        let output = self.run(argv(&["show-ref"]))?;
        parser::refs::parse_show_ref(&output, BRANCH_PREFIX)
    }

    /// All tags as (name, id) pairs
    pub fn tags(&self) -> Result<Vec<NamedRef>> {
        let output = self.run(argv(&["show-ref"]))?;
        parser::refs::parse_show_ref(&output, TAG_PREFIX)
    }

    /// A branch as a lazy reference, validated through revparse
    pub fn branch(&self, name: &str) -> Result<Commitish<'_>> {
        self.revparse(name)?;
        Ok(Commitish::new(self, name))
    }

    pub fn create_branch(
        &self,
        refspec: &str,
        name: &str,
        force: bool,
        checkout: bool,
    ) -> Result<()> {
        let mut args = argv(&["branch", name, refspec]);
        if force {
            args.push("-f".to_string());
        }
        if checkout {
            args.push("-c".to_string());
        }
        self.run(args)?;
        Ok(())
    }

    pub fn delete_branch(&self, name: &str) -> Result<()> {
        self.run(argv(&["branch", "-d", name]))?;
        Ok(())
    }

    pub fn create_tag(&self, refspec: &str, name: &str, message: &str) -> Result<()> {
        self.run(argv(&["tag", name, refspec, "-m", message]))?;
        Ok(())
    }

    pub fn delete_tag(&self, name: &str) -> Result<()> {
        self.run(argv(&["tag", "-d", name]))?;
        Ok(())
    }

    // ---- history surgery ----------------------------------------------

    /// Merge `refspec` into the current branch
    pub fn merge(&self, refspec: &str, no_commit: bool, message: Option<&str>) -> Result<()> {
        let mut args = argv(&["merge", refspec]);
        if no_commit {
            args.push("--no-commit".to_string());
        } else if let Some(message) = message {
            args.push("-m".to_string());
            args.push(message.to_string());
        }
        self.run(args)?;
        Ok(())
    }

    pub fn rebase(&self, refspec: &str) -> Result<()> {
        self.run(argv(&["rebase", refspec]))?;
        Ok(())
    }

    pub fn cherry_pick(&self, refspec: &str) -> Result<()> {
        self.run(argv(&["cherry-pick", refspec]))?;
        Ok(())
    }

    // ---- remotes ------------------------------------------------------

    pub fn remotes(&self) -> Result<Vec<Remote>> {
        let output = self.run(argv(&["remote", "list", "-v"]))?;
        parser::refs::parse_remotes(&output)
    }

    pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run(argv(&["remote", "add", name, url]))?;
        Ok(())
    }

    pub fn remove_remote(&self, name: &str) -> Result<()> {
        self.run(argv(&["remote", "remove", name]))?;
        Ok(())
    }

    // ---- geospatial import/export -------------------------------------

    pub fn import_shapefile(&self, shapefile: &Path, dest: Option<&str>, add: bool) -> Result<()> {
        let mut args = vec![
            "shp".to_string(),
            "import".to_string(),
            shapefile.display().to_string(),
        ];
        if let Some(dest) = dest {
            args.push("--dest".to_string());
            args.push(dest.to_string());
        }
        if add {
            args.push("--add".to_string());
        }
        self.run(args)?;
        Ok(())
    }

    pub fn export_shapefile(&self, refspec: &str, path: &str, shapefile: &Path) -> Result<()> {
        self.run(vec![
            "shp".to_string(),
            "export".to_string(),
            format!("{}:{}", refspec, path),
            shapefile.display().to_string(),
            "-o".to_string(),
        ])?;
        Ok(())
    }

    pub fn export_spatialite(&self, refspec: &str, database: &str) -> Result<()> {
        self.run(argv(&[
            "sl", "export", refspec, "exported", "--database", database,
        ]))?;
        Ok(())
    }

    pub fn import_osm(&self, osmfile: &Path, add: bool) -> Result<()> {
        let mut args = vec![
            "osm".to_string(),
            "import".to_string(),
            osmfile.display().to_string(),
        ];
        if add {
            args.push("--add".to_string());
        }
        self.run(args)?;
        Ok(())
    }

    pub fn download_osm(&self, url: &str, bbox: [f64; 4]) -> Result<()> {
        let mut args = argv(&["osm", "download", url, "--bbox"]);
        args.extend(bbox.iter().map(|coord| coord.to_string()));
        self.run(args)?;
        Ok(())
    }

    // ---- raw access ---------------------------------------------------

    /// Raw object listing for any reference
    pub fn cat(&self, reference: &str) -> Result<Vec<String>> {
        self.run(argv(&["cat", reference]))
    }

    /// Human-readable description of any reference
    pub fn show(&self, refspec: &str) -> Result<String> {
        Ok(self.run(argv(&["show", refspec]))?.join("\n"))
    }

    // ---- patches ------------------------------------------------------

    /// Write a patch that sets `new_attributes` on the working tree
    /// feature at `path`.
    ///
    /// The patch starts with the feature-type description and then one
    /// `<type-tag>\t<value>` line per attribute, sorted by name. An
    /// attribute absent from the current snapshot is a
    /// [`GeogitError::MissingAttribute`]. The file is kept on disk until
    /// the caller removes it.
    pub fn create_patch_file(
        &self,
        path: &str,
        new_attributes: &BTreeMap<String, Value>,
    ) -> Result<PathBuf> {
        let raw = self.run(vec![
            "show".to_string(),
            "--raw".to_string(),
            format!("{}:{}", WORK_HEAD, path),
        ])?;
        let feature_type_id = raw
            .first()
            .and_then(|line| line.split(' ').next())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                GeogitError::Parse(format!("no feature type header for '{}'", path))
            })?
            .to_string();

        let type_lines = self.cat(&feature_type_id)?;
        let current = self.feature_data(WORK_HEAD, path)?;

        let mut contents = String::new();
        for line in type_lines.iter().skip(1) {
            contents.push_str(line);
            contents.push('\n');
        }
        for (name, value) in new_attributes {
            let Some(attribute) = current.get(name) else {
                return Err(GeogitError::MissingAttribute(name.clone()));
            };
            contents.push_str(attribute.declared.tag());
            contents.push('\t');
            contents.push_str(&value.to_string());
            contents.push('\n');
        }

        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;
        let (_, patch_path) = file.keep().map_err(|e| GeogitError::Io(e.error))?;
        Ok(patch_path)
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}
