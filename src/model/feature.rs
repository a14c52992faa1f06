use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{AttributeDiff, BlameEntry, Commit};
use crate::parser::attributes::Attributes;
use crate::repository::Repository;

/// A leaf geospatial record at (refspec, path), analogous to a file.
///
/// The handle itself is cheap; attribute data is fetched on demand.
#[derive(Debug, Clone)]
pub struct Feature<'r> {
    repo: &'r Repository,
    refspec: String,
    path: String,
}

impl<'r> Feature<'r> {
    pub fn new<R: Into<String>, P: Into<String>>(repo: &'r Repository, refspec: R, path: P) -> Self {
        Self {
            repo,
            refspec: refspec.into(),
            path: path.into(),
        }
    }

    pub fn refspec(&self) -> &str {
        &self.refspec
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// This feature's attribute snapshot
    pub fn attributes(&self) -> Result<Attributes> {
        self.repo.feature_data(&self.refspec, &self.path)
    }

    /// Per-attribute provenance
    pub fn blame(&self) -> Result<BTreeMap<String, BlameEntry>> {
        self.repo.blame(&self.path)
    }

    /// Attribute-level differences against the same path in `other`
    pub fn diff_to(&self, other: &str) -> Result<BTreeMap<String, AttributeDiff>> {
        self.repo.feature_diff(&self.refspec, other, &self.path)
    }
}

/// One historical snapshot of a feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVersion {
    pub commit: Commit,
    pub attributes: Attributes,
}
