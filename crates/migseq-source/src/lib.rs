//! Implementations of the `migseq` collaborators.
//!
//! * [`GitDiff`] reports files added between two git revisions.
//! * [`Filesystem`] lists the files in the working tree.
//!
//! Both report paths relative to the repository with `/` separators, so the
//! listings they produce can be compared to one another.
mod fs;
pub use fs::Filesystem;

mod git;
pub use git::{GitDiff, GitError};

use std::path::{Component, Path};

/// Whether `path` is located under `root`.
///
/// With `nested = false` only direct children of `root` qualify.
pub(crate) fn under_root(path: &Path, root: &Path, nested: bool) -> bool {
    let root = normalize(root);
    let path = normalize(path);
    let Ok(rest) = path.strip_prefix(&root) else {
        return false;
    };
    match rest.components().count() {
        0 => false,
        1 => true,
        _ => nested,
    }
}

/// Render a path with `/` separators, dropping `.` components.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::CurDir => None,
            c => Some(c.as_os_str().to_string_lossy().into_owned()),
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize(path: &Path) -> std::path::PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{to_slash, under_root};
    use std::path::Path;

    #[test]
    fn direct_children_only_when_flat() {
        let root = Path::new("db/migration");
        assert!(under_root(Path::new("db/migration/V1__a.sql"), root, false));
        assert!(!under_root(Path::new("db/migration/2024/V1__a.sql"), root, false));
        assert!(under_root(Path::new("db/migration/2024/V1__a.sql"), root, true));
    }

    #[test]
    fn outside_root() {
        let root = Path::new("db/migration");
        assert!(!under_root(Path::new("db/fixtures/V1.1__a.sql"), root, true));
        assert!(!under_root(Path::new("db/migration_old/V1__a.sql"), root, true));
        assert!(!under_root(Path::new("db/migration"), root, true));
    }

    #[test]
    fn dot_components_are_ignored() {
        assert!(under_root(
            Path::new("db/migration/V1__a.sql"),
            Path::new("./db/migration/"),
            false
        ));
        assert!(under_root(Path::new("V1__a.sql"), Path::new("."), false));
        assert_eq!(
            to_slash(Path::new("./db/migration/V1__a.sql")),
            "db/migration/V1__a.sql"
        );
    }
}
