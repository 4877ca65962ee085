use serde::Serialize;
use std::path::PathBuf;

/// Default directory holding migrations, relative to the repository.
pub const DEFAULT_MIGRATION_ROOT: &str = "db/migration";
/// Default directory holding fixtures, relative to the repository.
pub const DEFAULT_FIXTURES_ROOT: &str = "db/fixtures";

/// Where the minor version expectation starts for a major receiving new
/// fixtures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MinorBaseline {
    /// Always start at 1.
    Fresh,
    /// Start at one more than the highest minor already recorded for the
    /// major, so fixtures can be appended to a major across separate changes.
    #[default]
    Continuation,
}

/// What to do when two files claim the same version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// A new file colliding with any other file of the same version fails.
    #[default]
    Reject,
    /// Fold duplicates together and check the versions only.
    Collapse,
}

/// Configuration of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub migration_root: PathBuf,
    pub fixtures_root: PathBuf,
    pub minor_baseline: MinorBaseline,
    pub duplicates: DuplicatePolicy,
    /// Consider files in subdirectories of the roots.
    pub nested_directories: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migration_root: PathBuf::from(DEFAULT_MIGRATION_ROOT),
            fixtures_root: PathBuf::from(DEFAULT_FIXTURES_ROOT),
            minor_baseline: MinorBaseline::default(),
            duplicates: DuplicatePolicy::default(),
            nested_directories: false,
        }
    }
}

impl Config {
    pub fn with_migration_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.migration_root = root.into();
        self
    }

    pub fn with_fixtures_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.fixtures_root = root.into();
        self
    }

    pub fn with_minor_baseline(mut self, baseline: MinorBaseline) -> Self {
        self.minor_baseline = baseline;
        self
    }

    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn nested(mut self, nested: bool) -> Self {
        self.nested_directories = nested;
        self
    }
}
