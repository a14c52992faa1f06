use std::collections::BTreeMap;

use crate::error::{GeogitError, Result};
use crate::model::{AttributeDiff, BlameEntry, Conflict, DiffEntry};

/// Sentinel printed by `conflicts` when nothing is left to merge
const NO_CONFLICTS_SENTINEL: &str = "No elements need merging";

/// Parse one `diff-tree` line: `<path> <old-ref> <new-ref>`.
///
/// Tokens are split on single spaces so an absent ref survives as an
/// empty token and drives the change-type classification.
pub fn parse_diff_entry(line: &str) -> Result<DiffEntry> {
    let tokens: Vec<&str> = line.split(' ').collect();
    if tokens.len() < 3 {
        return Err(GeogitError::Parse(format!("malformed diff line '{}'", line)));
    }

    Ok(DiffEntry {
        path: tokens[0].to_string(),
        old_ref: tokens[1].to_string(),
        new_ref: tokens[2].to_string(),
    })
}

/// Parse a whole `diff-tree` listing, skipping blank lines
pub fn parse_diff<S: AsRef<str>>(lines: &[S]) -> Result<Vec<DiffEntry>> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| !line.is_empty())
        .map(parse_diff_entry)
        .collect()
}

/// Parse a `conflicts --refspecs-only` listing.
///
/// The sentinel line yields an empty map, not an error; otherwise each
/// non-empty line is `<path> <ancestor> <ours> <theirs>`.
pub fn parse_conflicts<S: AsRef<str>>(lines: &[S]) -> Result<BTreeMap<String, Conflict>> {
    let mut conflicts = BTreeMap::new();

    for line in lines {
        let line = line.as_ref();
        if line.starts_with(NO_CONFLICTS_SENTINEL) {
            return Ok(BTreeMap::new());
        }
        if line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() < 4 {
            return Err(GeogitError::Parse(format!(
                "malformed conflict line '{}'",
                line
            )));
        }

        conflicts.insert(
            tokens[0].to_string(),
            Conflict {
                ancestor: tokens[1].to_string(),
                ours: tokens[2].to_string(),
                theirs: tokens[3].to_string(),
            },
        );
    }

    Ok(conflicts)
}

/// Parse a `blame --porcelain` listing into per-attribute provenance.
///
/// Tokens 0..3 are attribute name, commit id and author; the value text
/// is tokens 6 onward rejoined with single spaces.
pub fn parse_blame<S: AsRef<str>>(lines: &[S]) -> Result<BTreeMap<String, BlameEntry>> {
    let mut attributes = BTreeMap::new();

    for line in lines {
        let line = line.as_ref();
        if line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() < 3 {
            return Err(GeogitError::Parse(format!(
                "malformed blame line '{}'",
                line
            )));
        }

        let value = if tokens.len() > 6 {
            tokens[6..].join(" ")
        } else {
            String::new()
        };

        attributes.insert(
            tokens[0].to_string(),
            BlameEntry {
                value,
                commit: tokens[1].to_string(),
                author: tokens[2].to_string(),
            },
        );
    }

    Ok(attributes)
}

/// Parse a `diff-tree --describe` body into per-field old/new values.
///
/// Each entry is a `<letter> <field>` header followed by value lines:
/// `M` takes old then new, `A` takes new only, `R` takes old only.
/// Headers with an unrecognized letter are discarded; running out of
/// value lines mid-entry is an error.
pub fn parse_feature_diff<S: AsRef<str>>(lines: &[S]) -> Result<BTreeMap<String, AttributeDiff>> {
    let mut diffs = BTreeMap::new();
    let mut cursor = 0;

    while cursor < lines.len() {
        let header = lines[cursor].as_ref();
        cursor += 1;

        let tokens: Vec<&str> = header.split(' ').collect();
        if tokens.len() != 2 {
            continue;
        }

        let field = tokens[1];
        let (old, new) = match tokens[0] {
            "M" => {
                let old = take_value_line(lines, &mut cursor, header)?;
                let new = take_value_line(lines, &mut cursor, header)?;
                (Some(old), Some(new))
            }
            "A" => (None, Some(take_value_line(lines, &mut cursor, header)?)),
            "R" => (Some(take_value_line(lines, &mut cursor, header)?), None),
            _ => continue,
        };

        diffs.insert(field.to_string(), AttributeDiff { old, new });
    }

    Ok(diffs)
}

fn take_value_line<S: AsRef<str>>(lines: &[S], cursor: &mut usize, header: &str) -> Result<String> {
    let Some(line) = lines.get(*cursor) else {
        return Err(GeogitError::Parse(format!(
            "feature diff entry '{}' is missing its value line",
            header
        )));
    };
    *cursor += 1;
    Ok(line.as_ref().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeType;

    #[test]
    fn test_parse_diff_entry() {
        let entry = parse_diff_entry("parks/5 abc123 def456").unwrap();
        assert_eq!(entry.path, "parks/5");
        assert_eq!(entry.old_ref, "abc123");
        assert_eq!(entry.new_ref, "def456");
        assert_eq!(entry.change_type(), ChangeType::Modified);
    }

    #[test]
    fn test_parse_diff_entry_added() {
        // double space: the old ref is an empty token
        let entry = parse_diff_entry("parks/9  def456").unwrap();
        assert_eq!(entry.change_type(), ChangeType::Added);
    }

    #[test]
    fn test_parse_diff_entry_removed() {
        let entry = parse_diff_entry("parks/9 abc123 ").unwrap();
        assert_eq!(entry.change_type(), ChangeType::Removed);
    }

    #[test]
    fn test_parse_diff_entry_too_few_tokens() {
        assert!(parse_diff_entry("parks/5 abc123").is_err());
    }

    #[test]
    fn test_parse_diff_skips_blank_lines() {
        let lines = ["parks/5 abc123 def456", "", "parks/6 abc123 def456"];
        let entries = parse_diff(&lines).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_conflicts_sentinel_yields_empty_map() {
        let lines = ["No elements need merging"];
        assert!(parse_conflicts(&lines).unwrap().is_empty());
    }

    #[test]
    fn test_conflicts_entries() {
        let lines = [
            "parks/5 257c8cb9a7eb5ad4740b970bf4e4f901b98042ef:parks/5 \
             267aafec09e34f289fe9ca9e149ca7f55035bc7a:parks/5 \
             02284b8722378a8850e204ffd396bd2f12e3f91f:parks/5",
        ];
        let conflicts = parse_conflicts(&lines).unwrap();
        assert_eq!(conflicts.len(), 1);

        let conflict = &conflicts["parks/5"];
        assert_eq!(
            conflict.ancestor,
            "257c8cb9a7eb5ad4740b970bf4e4f901b98042ef:parks/5"
        );
        assert_eq!(
            conflict.ours,
            "267aafec09e34f289fe9ca9e149ca7f55035bc7a:parks/5"
        );
        assert_eq!(
            conflict.theirs,
            "02284b8722378a8850e204ffd396bd2f12e3f91f:parks/5"
        );
    }

    #[test]
    fn test_conflicts_malformed_line() {
        let lines = ["parks/5 onlytwo tokens"];
        assert!(parse_conflicts(&lines).is_err());
    }

    #[test]
    fn test_blame_porcelain() {
        let lines = ["area 02284b8722378a8850e204ffd396bd2f12e3f91f volaya 0 0 0 1234.5"];
        let blame = parse_blame(&lines).unwrap();

        let entry = &blame["area"];
        assert_eq!(entry.value, "1234.5");
        assert_eq!(entry.commit, "02284b8722378a8850e204ffd396bd2f12e3f91f");
        assert_eq!(entry.author, "volaya");
    }

    #[test]
    fn test_blame_value_rejoins_spaces() {
        let lines = ["name 02284b87 volaya 0 0 0 Central Park West"];
        let blame = parse_blame(&lines).unwrap();
        assert_eq!(blame["name"].value, "Central Park West");
    }

    #[test]
    fn test_blame_short_value_is_empty() {
        let lines = ["area 02284b87 volaya"];
        let blame = parse_blame(&lines).unwrap();
        assert_eq!(blame["area"].value, "");
    }

    #[test]
    fn test_blame_malformed_line() {
        let lines = ["area 02284b87"];
        assert!(parse_blame(&lines).is_err());
    }

    #[test]
    fn test_feature_diff_modified() {
        let lines = ["M area", "100.0", "200.0"];
        let diffs = parse_feature_diff(&lines).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs["area"].old.as_deref(), Some("100.0"));
        assert_eq!(diffs["area"].new.as_deref(), Some("200.0"));
    }

    #[test]
    fn test_feature_diff_added_and_removed() {
        let lines = ["A owner", "city", "R perimeter", "123.4"];
        let diffs = parse_feature_diff(&lines).unwrap();

        assert_eq!(diffs["owner"].old, None);
        assert_eq!(diffs["owner"].new.as_deref(), Some("city"));
        assert_eq!(diffs["perimeter"].old.as_deref(), Some("123.4"));
        assert_eq!(diffs["perimeter"].new, None);
    }

    #[test]
    fn test_feature_diff_unknown_letter_is_skipped() {
        let lines = ["X area", "M perimeter", "1.0", "2.0"];
        let diffs = parse_feature_diff(&lines).unwrap();
        assert_eq!(diffs.len(), 1);
        assert!(diffs.contains_key("perimeter"));
    }

    #[test]
    fn test_feature_diff_truncated_entry_is_an_error() {
        let lines = ["M area", "100.0"];
        assert!(matches!(
            parse_feature_diff(&lines),
            Err(GeogitError::Parse(_))
        ));
    }

    #[test]
    fn test_feature_diff_nonheader_lines_are_skipped() {
        let lines = ["three token line", "M area", "1.0", "2.0"];
        let diffs = parse_feature_diff(&lines).unwrap();
        assert_eq!(diffs.len(), 1);
    }
}
