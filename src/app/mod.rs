use migseq_core::error::{Error, SeqResult, SourceError as _};
use migseq_core::sequence::next_version;
use migseq_core::source::{ChangeSource, Inputs, TreeSource};
use migseq_core::version::{FixtureFile, VersionId, parse_migrations};
use migseq_core::{Config, Validator};

use std::fs::File;
use std::io::Write as _;
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
mod cli_opts;
#[cfg(feature = "cli")]
pub use cli_opts::run_cli;

mod report;
pub use report::{NextVersions, Report};

/// `GateOp` are the operations exposed by `Gate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GateOp {
    /// Validate new migrations, then new fixtures.
    #[default]
    Check,
    /// Validate new migrations only.
    CheckMigrations,
    /// Report the next free migration version, and optionally the next free
    /// fixture minor for a major.
    NextVersion { fixture_for: Option<u64> },
}

/// `Gate` is the main application, validating the files a change adds
/// against the files in the tree.
#[derive(Debug, Clone)]
pub struct Gate<C, T> {
    config: Config,
    changes: C,
    tree: T,
    operation: GateOp,
}

impl<C, T> Gate<C, T>
where
    C: ChangeSource,
    T: TreeSource,
{
    /// Create a new `Gate` running [`GateOp::Check`].
    pub fn new(config: Config, changes: C, tree: T) -> Self {
        Self {
            config,
            changes,
            tree,
            operation: GateOp::default(),
        }
    }

    /// Set the operation that should be ran with this configuration.
    pub fn with_operation(mut self, op: GateOp) -> Self {
        self.operation = op;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run this `Gate` application.
    ///
    /// The first violation found is returned as the error; nothing after it
    /// is checked.
    pub fn run(&self) -> SeqResult<Report> {
        self.require_migration_root()?;

        match self.operation {
            GateOp::Check => {
                log::trace!(target: "migseq", "check migrations and fixtures");
                self.check(true)
            }
            GateOp::CheckMigrations => {
                log::trace!(target: "migseq", "check migrations");
                self.check(false)
            }
            GateOp::NextVersion { fixture_for } => {
                log::trace!(target: "migseq", "next version");
                let next = self.next_versions(fixture_for)?;
                Ok(Report::new(&self.config).with_next(next))
            }
        }
    }

    /// Create an empty migration, or a fixture for the major `fixture_for`,
    /// named with the next free version.  Returns the path of the new file.
    ///
    /// `repo` is the directory the configured roots are relative to.
    pub fn create(
        &self,
        repo: &Path,
        description: &str,
        fixture_for: Option<u64>,
    ) -> SeqResult<PathBuf> {
        self.require_migration_root()?;
        let next = self.next_versions(fixture_for)?;

        let (root, version) = match next.fixture {
            Some(fixture) => (&self.config.fixtures_root, fixture),
            None => (
                &self.config.migration_root,
                VersionId::migration(next.migration),
            ),
        };
        let dir = repo.join(root);
        if !dir.is_dir() {
            return Err(Error::Invalid(format!(
                "{} is not a directory or does not exist",
                dir.display()
            )));
        }

        let path = dir.join(new_filename(version, description));
        log::info!(target: "migseq", "creating {}", path.display());
        File::create_new(&path)
            .and_then(|mut f| f.write_all(template(version).as_bytes()))
            .source_result(&format!("new file {}", path.display()))?;

        Ok(path)
    }

    fn require_migration_root(&self) -> SeqResult<()> {
        if self.tree.has_dir(&self.config.migration_root) {
            Ok(())
        } else {
            Err(Error::MissingMigrationRoot(self.config.migration_root.clone()))
        }
    }

    fn check(&self, with_fixtures: bool) -> SeqResult<Report> {
        let validator = Validator::new(&self.config);
        let inputs = self.migration_inputs()?;
        let migrations =
            validator.validate_migrations(&inputs.all_migrations, &inputs.new_migrations)?;
        if !with_fixtures {
            return Ok(Report::new(&self.config).with_migrations(migrations));
        }

        let inputs = self.fixture_inputs(inputs)?;
        let fixtures =
            validator.validate_fixtures(&migrations, &inputs.all_fixtures, &inputs.new_fixtures)?;

        Ok(Report::new(&self.config)
            .with_migrations(migrations)
            .with_fixtures(fixtures))
    }

    fn migration_inputs(&self) -> SeqResult<Inputs> {
        let root = &self.config.migration_root;
        Ok(Inputs {
            all_migrations: self.tree.list_files(root)?,
            new_migrations: self.changes.added_files(root)?,
            ..Default::default()
        })
    }

    fn fixture_inputs(&self, inputs: Inputs) -> SeqResult<Inputs> {
        let root = &self.config.fixtures_root;
        if !self.tree.has_dir(root) {
            log::info!(target: "migseq", "no fixtures: {} does not exist", root.display());
            return Ok(inputs);
        }

        Ok(Inputs {
            all_fixtures: self.tree.list_files(root)?,
            new_fixtures: self.changes.added_files(root)?,
            ..inputs
        })
    }

    fn next_versions(&self, fixture_for: Option<u64>) -> SeqResult<NextVersions> {
        let migrations = self.tree.list_files(&self.config.migration_root)?;
        let latest = parse_migrations(&migrations)
            .iter()
            .map(|m| m.version)
            .max()
            .unwrap_or(0);

        let fixture = match fixture_for {
            Some(major) => {
                let root = &self.config.fixtures_root;
                let fixtures = if self.tree.has_dir(root) {
                    self.tree.list_files(root)?
                } else {
                    Vec::new()
                };
                let minor = fixtures
                    .iter()
                    .filter_map(|p| FixtureFile::parse(p).ok())
                    .filter(|f| f.major == major)
                    .map(|f| f.minor)
                    .max()
                    .unwrap_or(0);
                Some(VersionId::fixture(major, next_version(minor)?))
            }
            None => None,
        };

        Ok(NextVersions {
            migration: next_version(latest)?,
            fixture,
        })
    }
}

fn new_filename(version: VersionId, description: &str) -> String {
    let descr = description.trim().to_ascii_lowercase().replace(' ', "_");
    format!("{version}__{descr}.sql")
}

fn template(version: VersionId) -> String {
    match version.minor() {
        Some(_) => format!("-- Fixture data for {version} below.\n"),
        None => format!("-- Add the SQL for migration {version} below.\n"),
    }
}
