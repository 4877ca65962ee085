use crate::to_slash;

use migseq_core::error::{SeqResult, SourceError as _};
use migseq_core::source::TreeSource;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The files checked out in a repository directory.
#[derive(Debug, Clone)]
pub struct Filesystem {
    repo: PathBuf,
    nested: bool,
}

impl Filesystem {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            nested: false,
        }
    }

    /// Also list files in subdirectories of a root.
    pub fn nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }
}

impl TreeSource for Filesystem {
    fn list_files(&self, root: &Path) -> SeqResult<Vec<String>> {
        let dir = self.repo.join(root);
        let depth = if self.nested { usize::MAX } else { 1 };
        let what = format!("files in {}", dir.display());

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(depth) {
            let entry = entry.source_result(&what)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.repo).unwrap_or(entry.path());
            files.push(to_slash(relative));
        }
        files.sort();
        log::debug!(target: "migseq", "{} files in {}", files.len(), dir.display());

        Ok(files)
    }

    fn has_dir(&self, root: &Path) -> bool {
        self.repo.join(root).is_dir()
    }
}
