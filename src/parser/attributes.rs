use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{GeogitError, Result};
use crate::parser::value::{self, AttributeType, Value};

/// A decoded value together with its declared type tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub value: Value,
    pub declared: AttributeType,
}

/// One feature snapshot's attributes, keyed by attribute name.
///
/// Names are unique per snapshot; a duplicate keeps the last occurrence.
pub type Attributes = BTreeMap<String, Attribute>;

/// Parse repeated (name, type-tag, value) line triplets.
///
/// The stream must contain a whole number of triplets; running out of
/// input mid-triplet is a [`GeogitError::MalformedAttributeBlock`],
/// never a silently dropped partial group.
pub fn parse_attributes<S: AsRef<str>>(lines: &[S]) -> Result<Attributes> {
    if lines.len() % 3 != 0 {
        return Err(GeogitError::MalformedAttributeBlock(format!(
            "{} lines do not form whole (name, type, value) triplets",
            lines.len()
        )));
    }

    let mut attributes = Attributes::new();
    let mut cursor = 0;
    while cursor < lines.len() {
        let name = lines[cursor].as_ref();
        let declared = AttributeType::from_tag(lines[cursor + 1].as_ref());
        let value = value::decode(lines[cursor + 2].as_ref(), &declared)?;
        attributes.insert(name.to_string(), Attribute { value, declared });
        cursor += 3;
    }

    Ok(attributes)
}
