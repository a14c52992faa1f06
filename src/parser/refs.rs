use crate::error::{GeogitError, Result};
use crate::model::{NamedRef, NodeKind, Remote, TreeEntry};

/// Ref-path prefix of branches in a `show-ref` listing
pub const BRANCH_PREFIX: &str = "refs/heads/";
/// Ref-path prefix of tags in a `show-ref` listing
pub const TAG_PREFIX: &str = "refs/tags/";

/// Parse `ls-tree -v` output into typed child entries.
///
/// Rows whose kind token is neither `feature` nor `tree` are skipped.
pub fn parse_ls_tree<S: AsRef<str>>(lines: &[S]) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() < 4 {
            return Err(GeogitError::Parse(format!(
                "malformed ls-tree line '{}'",
                line
            )));
        }

        let kind = match tokens[1] {
            "feature" => NodeKind::Feature,
            "tree" => NodeKind::Tree,
            _ => continue,
        };

        entries.push(TreeEntry {
            kind,
            path: tokens[3].to_string(),
        });
    }

    Ok(entries)
}

/// Parse a `show-ref` listing, keeping refs under the given prefix.
///
/// Each line is `<id> <ref-path>`; the prefix is stripped from the name.
pub fn parse_show_ref<S: AsRef<str>>(lines: &[S], prefix: &str) -> Result<Vec<NamedRef>> {
    let mut refs = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() < 2 {
            return Err(GeogitError::Parse(format!(
                "malformed show-ref line '{}'",
                line
            )));
        }

        if let Some(name) = tokens[1].strip_prefix(prefix) {
            refs.push(NamedRef {
                name: name.to_string(),
                id: tokens[0].to_string(),
            });
        }
    }

    Ok(refs)
}

/// Parse `remote list -v` output.
///
/// Fetch and push rows repeat the remote name; the first occurrence
/// wins and input order is preserved.
pub fn parse_remotes<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Remote>> {
    let mut remotes: Vec<Remote> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() < 2 {
            return Err(GeogitError::Parse(format!(
                "malformed remote line '{}'",
                line
            )));
        }

        if remotes.iter().all(|remote| remote.name != tokens[0]) {
            remotes.push(Remote {
                name: tokens[0].to_string(),
                url: tokens[1].to_string(),
            });
        }
    }

    Ok(remotes)
}
