use std::collections::BTreeMap;

use crate::error::{GeogitError, Result};
use crate::parser::attributes::{self, Attributes};

/// Parse a multi-feature `show --raw` stream.
///
/// Each feature is a header line carrying its key, one identifier line
/// that is discarded, then attribute triplets up to a blank line. The
/// final block may end at end-of-stream instead of a blank line.
pub fn parse_feature_collection<S: AsRef<str>>(
    lines: &[S],
) -> Result<BTreeMap<String, Attributes>> {
    let mut features = BTreeMap::new();
    let mut cursor = 0;

    while cursor < lines.len() {
        let header = lines[cursor].as_ref();
        cursor += 1;
        if header.is_empty() {
            continue;
        }

        if cursor >= lines.len() {
            return Err(GeogitError::Parse(format!(
                "feature block '{}' ends before its identifier line",
                header
            )));
        }
        // identifier line, not part of the attributes
        cursor += 1;

        let start = cursor;
        while cursor < lines.len() && !lines[cursor].as_ref().is_empty() {
            cursor += 1;
        }

        let attrs = attributes::parse_attributes(&lines[start..cursor])?;
        features.insert(header.to_string(), attrs);
    }

    Ok(features)
}
