use crate::error::Result;
use crate::model::Feature;
use crate::repository::Repository;

/// A grouping node at (refspec, path) within a revision's hierarchy.
///
/// Like every domain handle this is a point-in-time view; children are
/// listed fresh on each call.
#[derive(Debug, Clone)]
pub struct Tree<'r> {
    repo: &'r Repository,
    refspec: String,
    path: String,
}

impl<'r> Tree<'r> {
    pub fn new<R: Into<String>, P: Into<String>>(repo: &'r Repository, refspec: R, path: P) -> Self {
        Self {
            repo,
            refspec: refspec.into(),
            path: path.into(),
        }
    }

    /// The root tree of a revision (empty path)
    pub(crate) fn root<R: Into<String>>(repo: &'r Repository, refspec: R) -> Self {
        Self::new(repo, refspec, String::new())
    }

    pub fn refspec(&self) -> &str {
        &self.refspec
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn path_arg(&self) -> Option<&str> {
        if self.path.is_empty() {
            None
        } else {
            Some(&self.path)
        }
    }

    /// All direct children, trees and features alike
    pub fn children(&self) -> Result<Vec<Child<'r>>> {
        self.repo.children(&self.refspec, self.path_arg(), false)
    }

    /// Direct child trees
    pub fn trees(&self) -> Result<Vec<Tree<'r>>> {
        self.repo.trees(&self.refspec, self.path_arg())
    }

    /// Direct child features
    pub fn features(&self) -> Result<Vec<Feature<'r>>> {
        self.repo.features(&self.refspec, self.path_arg())
    }
}

/// A child node listed under a tree
#[derive(Debug, Clone)]
pub enum Child<'r> {
    Tree(Tree<'r>),
    Feature(Feature<'r>),
}

impl<'r> Child<'r> {
    pub fn path(&self) -> &str {
        match self {
            Child::Tree(tree) => tree.path(),
            Child::Feature(feature) => feature.path(),
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Child::Tree(_))
    }

    pub fn is_feature(&self) -> bool {
        matches!(self, Child::Feature(_))
    }
}
