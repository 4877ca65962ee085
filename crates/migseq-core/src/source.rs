//! Collaborators that supply the file listings a validation run consumes.
//!
//! Neither is implemented here; see the `migseq-source` crate for the version
//! control and filesystem implementations.
use crate::error::SeqResult;

use std::path::Path;

/// Files added by the change under validation.
pub trait ChangeSource {
    /// Paths of files added under `root` between the base and head of the
    /// change.
    fn added_files(&self, root: &Path) -> SeqResult<Vec<String>>;
}

/// Files present in the working tree.
pub trait TreeSource {
    /// Paths of every file under `root`.
    fn list_files(&self, root: &Path) -> SeqResult<Vec<String>>;

    /// Whether `root` exists as a directory.
    fn has_dir(&self, root: &Path) -> bool;
}

/// A change that adds no files, for operations that only look at the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChanges;

impl ChangeSource for NoChanges {
    fn added_files(&self, _root: &Path) -> SeqResult<Vec<String>> {
        Ok(Vec::new())
    }
}

impl<T: ChangeSource + ?Sized> ChangeSource for &T {
    fn added_files(&self, root: &Path) -> SeqResult<Vec<String>> {
        (**self).added_files(root)
    }
}

impl<T: TreeSource + ?Sized> TreeSource for &T {
    fn list_files(&self, root: &Path) -> SeqResult<Vec<String>> {
        (**self).list_files(root)
    }

    fn has_dir(&self, root: &Path) -> bool {
        (**self).has_dir(root)
    }
}

/// The four listings one run validates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    /// Every migration-like file currently in the tree, new ones included.
    pub all_migrations: Vec<String>,
    /// Migration files added by the change.
    pub new_migrations: Vec<String>,
    /// Every fixture file currently in the tree, new ones included.
    pub all_fixtures: Vec<String>,
    /// Fixture files added by the change.
    pub new_fixtures: Vec<String>,
}
