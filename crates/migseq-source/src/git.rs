use crate::under_root;

use migseq_core::error::{SeqResult, SourceError as _};
use migseq_core::source::ChangeSource;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::string::FromUtf8Error;

/// Failure running `git`.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("could not run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("`git {args}` exited with {status}: {stderr}")]
    Status {
        args: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("git output is not utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Files added between a base and a head revision, as seen by `git diff`.
#[derive(Debug, Clone)]
pub struct GitDiff {
    repo: PathBuf,
    base: String,
    head: String,
    nested: bool,
}

impl GitDiff {
    pub fn new(
        repo: impl Into<PathBuf>,
        base: impl Into<String>,
        head: impl Into<String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            base: base.into(),
            head: head.into(),
            nested: false,
        }
    }

    /// Also report files added in subdirectories of a root.
    pub fn nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    /// The diff is taken from the merge base of `base` and `head`, so commits
    /// that landed on the base after the branch was cut are not counted.
    ///
    /// `--relative` keeps the reported paths relative to `repo` when it is a
    /// subdirectory of the git toplevel, matching [`crate::Filesystem`].  With
    /// `--no-renames` a file renamed onto a new version shows up as added.
    fn diff_args(&self, root: &Path) -> Vec<String> {
        vec![
            "diff".to_string(),
            "--name-only".to_string(),
            "--relative".to_string(),
            "--no-renames".to_string(),
            "--diff-filter=A".to_string(),
            format!("{}...{}", self.base, self.head),
            "--".to_string(),
            root.to_string_lossy().into_owned(),
        ]
    }

    fn git(&self, args: &[String]) -> Result<String, GitError> {
        log::debug!(target: "migseq", "running git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()?;
        if !output.status.success() {
            return Err(GitError::Status {
                args: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}

impl ChangeSource for GitDiff {
    fn added_files(&self, root: &Path) -> SeqResult<Vec<String>> {
        let stdout = self
            .git(&self.diff_args(root))
            .source_result(&format!("files added under {}", root.display()))?;
        let added = parse_name_only(&stdout, root, self.nested);
        log::debug!(
            target: "migseq",
            "{} files added under {} in {}...{}",
            added.len(),
            root.display(),
            self.base,
            self.head,
        );

        Ok(added)
    }
}

/// Lines of `git diff --name-only` output that are under `root`.
fn parse_name_only(stdout: &str, root: &Path, nested: bool) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| under_root(Path::new(line), root, nested))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{GitDiff, GitError, parse_name_only};
    use migseq_core::error::Error;
    use migseq_core::source::ChangeSource;
    use std::fs;
    use std::path::Path;
    use std::process::Command;
    use tempfile::TempDir;

    const DIFF: &str = "
db/migration/V4__add_orders.sql
db/migration/archive/V2__old.sql
db/fixtures/V4.1__orders.sql
src/main.rs

";

    #[test]
    fn flat_listing() {
        let added = parse_name_only(DIFF, Path::new("db/migration"), false);
        assert_eq!(added, vec!["db/migration/V4__add_orders.sql"]);
    }

    #[test]
    fn nested_listing() {
        let added = parse_name_only(DIFF, Path::new("db/migration"), true);
        assert_eq!(
            added,
            vec![
                "db/migration/V4__add_orders.sql",
                "db/migration/archive/V2__old.sql"
            ]
        );
    }

    #[test]
    fn args_use_merge_base_range() {
        let diff = GitDiff::new(".", "origin/main", "HEAD");
        let args = diff.diff_args(Path::new("db/fixtures"));
        assert_eq!(
            args,
            vec![
                "diff",
                "--name-only",
                "--relative",
                "--no-renames",
                "--diff-filter=A",
                "origin/main...HEAD",
                "--",
                "db/fixtures"
            ]
        );
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(["-c", "user.name=migseq", "-c", "user.email=migseq@localhost"])
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .current_dir(dir)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    fn write(dir: &Path, path: &str) {
        let path = dir.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "select 1;").unwrap();
    }

    fn commit(dir: &Path, message: &str) {
        git(dir, &["add", "-A"]);
        git(dir, &["commit", "-q", "-m", message]);
    }

    /// A repository with a service directory, where the last commit adds a
    /// migration and a fixture.
    fn monorepo() -> TempDir {
        let temp = TempDir::new().unwrap();
        let top = temp.path();
        git(top, &["init", "-q"]);
        write(top, "service/db/migration/V1__init.sql");
        commit(top, "base");
        write(top, "service/db/migration/V5__gap.sql");
        write(top, "service/db/fixtures/V5.1__seed.sql");
        write(top, "README.md");
        commit(top, "head");
        temp
    }

    #[test]
    fn added_from_toplevel() {
        let temp = monorepo();
        let added = GitDiff::new(temp.path(), "HEAD~1", "HEAD")
            .added_files(Path::new("service/db/migration"))
            .unwrap();
        assert_eq!(added, vec!["service/db/migration/V5__gap.sql"]);
    }

    #[test]
    fn added_from_subdirectory_are_relative_to_it() {
        let temp = monorepo();
        let diff = GitDiff::new(temp.path().join("service"), "HEAD~1", "HEAD");
        assert_eq!(
            diff.added_files(Path::new("db/migration")).unwrap(),
            vec!["db/migration/V5__gap.sql"]
        );
        assert_eq!(
            diff.added_files(Path::new("db/fixtures")).unwrap(),
            vec!["db/fixtures/V5.1__seed.sql"]
        );
    }

    #[test]
    fn rename_counts_as_added() {
        let temp = monorepo();
        let top = temp.path();
        fs::rename(
            top.join("service/db/migration/V5__gap.sql"),
            top.join("service/db/migration/V2__users.sql"),
        )
        .unwrap();
        commit(top, "rename");

        let added = GitDiff::new(top.join("service"), "HEAD~1", "HEAD")
            .added_files(Path::new("db/migration"))
            .unwrap();
        assert_eq!(added, vec!["db/migration/V2__users.sql"]);
    }

    #[test]
    fn unknown_base_ref() {
        let temp = monorepo();
        let err = GitDiff::new(temp.path(), "no-such-branch", "HEAD")
            .added_files(Path::new("service/db/migration"))
            .unwrap_err();
        let Error::Source(what, source) = &err else {
            panic!("unexpected error {err}");
        };
        assert_eq!(what, "files added under service/db/migration");
        assert!(matches!(
            source.downcast_ref::<GitError>(),
            Some(GitError::Status { .. })
        ));
        assert!(!err.is_violation());
    }
}
