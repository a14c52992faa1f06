use chrono::{DateTime, Utc};

use crate::error::{GeogitError, Result};
use crate::model::{Commit, DiffEntry, LogEntry};
use crate::parser::diff;

/// Parse a `rev-list` stream of blank-separated commit blocks.
///
/// Entries come back in stream order, which is the engine's native
/// reverse-chronological traversal; callers must not re-sort them.
pub fn parse_log<S: AsRef<str>>(lines: &[S]) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.is_empty() {
            flush_block(&mut block, &mut entries)?;
        } else {
            block.push(line);
        }
    }
    flush_block(&mut block, &mut entries)?;

    Ok(entries)
}

fn flush_block(block: &mut Vec<&str>, entries: &mut Vec<LogEntry>) -> Result<()> {
    if !block.is_empty() {
        if let Some(entry) = parse_log_entry(&*block)? {
            entries.push(entry);
        }
        block.clear();
    }
    Ok(())
}

/// Parse one commit metadata block, with an optional trailing `changes`
/// section of changed-path diff lines.
///
/// Returns `None` when the block carries no `commit` line.
pub fn parse_log_entry<S: AsRef<str>>(lines: &[S]) -> Result<Option<LogEntry>> {
    let mut id: Option<String> = None;
    let mut tree: Option<String> = None;
    let mut parent: Option<String> = None;
    let mut author: Option<(String, DateTime<Utc>)> = None;
    let mut committer: Option<(String, DateTime<Utc>)> = None;
    let mut message_lines: Vec<String> = Vec::new();
    let mut changes: Vec<DiffEntry> = Vec::new();
    let mut in_message = false;
    let mut in_changes = false;

    for line in lines {
        let line = line.as_ref();

        if in_message {
            if line.starts_with('\t') || line.starts_with(' ') {
                message_lines.push(line.trim().to_string());
                continue;
            }
            // an unindented line ends the message and is handled below
            in_message = false;
        }

        if in_changes {
            changes.push(diff::parse_diff_entry(line)?);
            continue;
        }

        let keyword = line.split(' ').next().unwrap_or("");
        match keyword {
            "commit" => id = Some(second_token(line)?),
            "tree" => tree = Some(second_token(line)?),
            "parent" => {
                let tokens: Vec<&str> = line.split(' ').collect();
                if parent.is_none() && tokens.len() == 2 && !tokens[1].is_empty() {
                    parent = Some(tokens[1].to_string());
                }
            }
            "author" => author = Some(parse_signature(line)?),
            "committer" => committer = Some(parse_signature(line)?),
            "message" => in_message = true,
            "changes" => in_changes = true,
            _ => {}
        }
    }

    let Some(id) = id else {
        return Ok(None);
    };
    let tree = tree.ok_or_else(|| missing_field(&id, "tree"))?;
    let (author, author_date) = author.ok_or_else(|| missing_field(&id, "author"))?;
    let (committer, committer_date) = committer.ok_or_else(|| missing_field(&id, "committer"))?;

    Ok(Some(LogEntry {
        commit: Commit {
            id,
            tree,
            parent,
            message: message_lines.join("\n"),
            author,
            author_date,
            committer,
            committer_date,
        },
        changes,
    }))
}

fn second_token(line: &str) -> Result<String> {
    line.split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GeogitError::Parse(format!("malformed header line '{}'", line)))
}

/// Parse `<keyword> <name...> <epoch-millis> <tz>`.
///
/// The engine reports milliseconds; sub-second precision is truncated.
fn parse_signature(line: &str) -> Result<(String, DateTime<Utc>)> {
    let tokens: Vec<&str> = line.split(' ').collect();
    if tokens.len() < 4 {
        return Err(GeogitError::Parse(format!(
            "malformed signature line '{}'",
            line
        )));
    }

    let name = tokens[1..tokens.len() - 2].join(" ");
    let millis: i64 = tokens[tokens.len() - 2].parse().map_err(|_| {
        GeogitError::Parse(format!("bad timestamp in signature line '{}'", line))
    })?;
    let when = DateTime::from_timestamp(millis / 1000, 0)
        .ok_or_else(|| GeogitError::Parse(format!("timestamp out of range in '{}'", line)))?;

    Ok((name, when))
}

fn missing_field(id: &str, field: &str) -> GeogitError {
    GeogitError::Parse(format!("commit {} has no {} line", id, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeType;

    const COMMIT_ID: &str = "0123456789abcdef0123456789abcdef01234567";
    const TREE_ID: &str = "89abcdef0123456789abcdef0123456789abcdef";
    const PARENT_ID: &str = "fedcba9876543210fedcba9876543210fedcba98";

    fn block(parent: bool, message: &str) -> Vec<String> {
        let mut lines = vec![
            format!("commit {}", COMMIT_ID),
            format!("tree {}", TREE_ID),
        ];
        if parent {
            lines.push(format!("parent {}", PARENT_ID));
        }
        lines.push("author volaya volaya@example.com 1368703356119 0".to_string());
        lines.push("committer volaya volaya@example.com 1368703356119 0".to_string());
        lines.push("message".to_string());
        lines.push(format!("\t{}", message));
        lines
    }

    #[test]
    fn test_parse_single_block() {
        let entry = parse_log_entry(&block(true, "initial import"))
            .unwrap()
            .unwrap();
        let commit = entry.commit;

        assert_eq!(commit.id, COMMIT_ID);
        assert_eq!(commit.tree, TREE_ID);
        assert_eq!(commit.parent.as_deref(), Some(PARENT_ID));
        assert_eq!(commit.message, "initial import");
        assert_eq!(commit.author, "volaya volaya@example.com");
        assert_eq!(commit.committer, "volaya volaya@example.com");
        // 1368703356119 ms truncates to second precision
        assert_eq!(commit.author_date.timestamp(), 1368703356);
        assert!(entry.changes.is_empty());
    }

    #[test]
    fn test_root_commit_has_no_parent() {
        let entry = parse_log_entry(&block(false, "root")).unwrap().unwrap();
        assert!(entry.commit.parent.is_none());
        assert!(entry.commit.is_root());
    }

    #[test]
    fn test_empty_parent_token_means_no_parent() {
        let mut lines = block(false, "root");
        lines.insert(2, "parent ".to_string());
        let entry = parse_log_entry(&lines).unwrap().unwrap();
        assert!(entry.commit.parent.is_none());
    }

    #[test]
    fn test_only_first_parent_is_kept() {
        let mut lines = block(true, "merge");
        lines.insert(
            3,
            "parent aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
        );
        let entry = parse_log_entry(&lines).unwrap().unwrap();
        assert_eq!(entry.commit.parent.as_deref(), Some(PARENT_ID));
    }

    #[test]
    fn test_multiline_message() {
        let mut lines = block(true, "first line");
        lines.push("\tsecond line".to_string());
        lines.push("  third line".to_string());
        let entry = parse_log_entry(&lines).unwrap().unwrap();
        assert_eq!(entry.commit.message, "first line\nsecond line\nthird line");
    }

    #[test]
    fn test_changes_section_after_message() {
        let mut lines = block(true, "edit park 5");
        lines.push("changes".to_string());
        lines.push(format!("parks/5 {} {}", TREE_ID, PARENT_ID));
        lines.push(format!("parks/6  {}", PARENT_ID));

        let entry = parse_log_entry(&lines).unwrap().unwrap();
        assert_eq!(entry.commit.message, "edit park 5");
        assert_eq!(entry.changes.len(), 2);
        assert_eq!(entry.changes[0].path, "parks/5");
        assert_eq!(entry.changes[0].change_type(), ChangeType::Modified);
        assert_eq!(entry.changes[1].change_type(), ChangeType::Added);
    }

    #[test]
    fn test_block_without_commit_line_yields_nothing() {
        let lines = ["tree something", "author a b 0 0"];
        assert!(parse_log_entry(&lines).unwrap().is_none());
    }

    #[test]
    fn test_missing_author_is_an_error() {
        let lines = [
            format!("commit {}", COMMIT_ID),
            format!("tree {}", TREE_ID),
            "committer volaya volaya@example.com 1368703356119 0".to_string(),
        ];
        assert!(matches!(
            parse_log_entry(&lines),
            Err(GeogitError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let lines = [
            format!("commit {}", COMMIT_ID),
            format!("tree {}", TREE_ID),
            "author volaya volaya@example.com notamillis 0".to_string(),
            "committer volaya volaya@example.com 1368703356119 0".to_string(),
        ];
        assert!(matches!(
            parse_log_entry(&lines),
            Err(GeogitError::Parse(_))
        ));
    }

    fn log_stream() -> Vec<String> {
        let mut lines = Vec::new();
        for i in (1..=4).rev() {
            lines.push(format!("commit {:040x}", i));
            lines.push(format!("tree {:040x}", i + 100));
            if i > 1 {
                lines.push(format!("parent {:040x}", i - 1));
            }
            lines.push("author volaya volaya@example.com 1368703356119 0".to_string());
            lines.push("committer volaya volaya@example.com 1368703356119 0".to_string());
            lines.push("message".to_string());
            lines.push(format!("\tmessage_{}", i));
            lines.push(String::new());
        }
        lines
    }

    #[test]
    fn test_log_stream_preserves_order() {
        let entries = parse_log(&log_stream()).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].commit.message, "message_4");
        assert_eq!(entries[3].commit.message, "message_1");
        assert!(entries[3].commit.parent.is_none());
    }

    #[test]
    fn test_log_stream_without_final_blank() {
        let mut lines = log_stream();
        lines.pop();
        let entries = parse_log(&lines).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3].commit.message, "message_1");
    }

    #[test]
    fn test_empty_log_stream() {
        let lines: [&str; 0] = [];
        assert!(parse_log(&lines).unwrap().is_empty());
    }
}
