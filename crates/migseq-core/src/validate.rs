//! The chained validation run: migrations first, then fixtures, stopping at
//! the first violation.
use crate::config::{Config, DuplicatePolicy};
use crate::error::{Error, SeqResult};
use crate::fixture::{FixtureCheck, FixtureValidator, allowed_majors};
use crate::partition::{Partition, VersionSet};
use crate::sequence::validate_sequence;
use crate::source::Inputs;
use crate::version::{FixtureFile, MigrationFile, VersionId, parse_fixtures, parse_migrations};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of a passing migration check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationCheck {
    /// Highest major before the change, 0 if there was none.
    pub latest_existing: u64,
    /// New majors, ascending.
    pub validated: Vec<u64>,
    /// The majors new fixtures may attach to.
    pub allowed_majors: VersionSet,
}

/// A passing verdict for a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub migrations: MigrationCheck,
    pub fixtures: FixtureCheck,
}

/// Validates listings according to a [`Config`].
#[derive(Debug, Clone)]
pub struct Validator<'a> {
    config: &'a Config,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Combined validation rules.
    pub fn validate(&self, inputs: &Inputs) -> SeqResult<Verdict> {
        let migrations =
            self.validate_migrations(&inputs.all_migrations, &inputs.new_migrations)?;
        let fixtures =
            self.validate_fixtures(&migrations, &inputs.all_fixtures, &inputs.new_fixtures)?;

        Ok(Verdict {
            migrations,
            fixtures,
        })
    }

    /// Check that new migrations continue the existing sequence.
    pub fn validate_migrations<S: AsRef<str>>(
        &self,
        all: &[S],
        new: &[S],
    ) -> SeqResult<MigrationCheck> {
        let all = parse_migrations(all);
        let new = parse_migrations(new);
        log::trace!(target: "migseq", "parsed {} migrations, {} new", all.len(), new.len());

        if self.config.duplicates == DuplicatePolicy::Reject {
            check_duplicates(
                all.iter().chain(&new).map(|m| (m.id(), m.path.as_str())),
                new.iter().map(MigrationFile::id),
            )?;
        }

        let new_majors: VersionSet = new.iter().map(|m| m.version).collect();
        let all_majors: VersionSet = all.iter().map(|m| m.version).collect();
        let partition = Partition::new(&all_majors.union(&new_majors), &new_majors);
        let latest_existing = partition.latest_existing();

        let sequence = validate_sequence(latest_existing, &new_majors.to_vec())?;
        log::info!(
            target: "migseq",
            "migrations ok: latest existing V{latest_existing}, {} new through V{}",
            sequence.validated.len(),
            sequence.last,
        );

        Ok(MigrationCheck {
            latest_existing,
            allowed_majors: allowed_majors(latest_existing, &new_majors),
            validated: sequence.validated,
        })
    }

    /// Check new fixtures against the result of the migration check.
    pub fn validate_fixtures<S: AsRef<str>>(
        &self,
        migrations: &MigrationCheck,
        all: &[S],
        new: &[S],
    ) -> SeqResult<FixtureCheck> {
        let new = parse_fixtures(new)?;
        let all: Vec<FixtureFile> = all
            .iter()
            .filter_map(|p| match FixtureFile::parse(p.as_ref()) {
                Ok(f) => Some(f),
                Err(e) => {
                    log::warn!(target: "migseq", "ignoring existing fixture: {e}");
                    None
                }
            })
            .collect();
        log::trace!(target: "migseq", "parsed {} fixtures, {} new", all.len(), new.len());

        if self.config.duplicates == DuplicatePolicy::Reject {
            check_duplicates(
                all.iter().chain(&new).map(|f| (f.id(), f.path.as_str())),
                new.iter().map(FixtureFile::id),
            )?;
        }

        let new_ids: BTreeSet<VersionId> = new.iter().map(FixtureFile::id).collect();
        let existing = all.iter().filter(|f| !new_ids.contains(&f.id()));

        let check = FixtureValidator::new(&migrations.allowed_majors, self.config.minor_baseline)
            .with_history(existing)
            .validate(&new)?;
        log::info!(
            target: "migseq",
            "fixtures ok: {} new across {} majors",
            new.len(),
            check.minors.len(),
        );

        Ok(check)
    }
}

/// Fail if any of the `new` versions is claimed by more than one distinct path.
fn check_duplicates<'p>(
    files: impl Iterator<Item = (VersionId, &'p str)>,
    new: impl Iterator<Item = VersionId>,
) -> SeqResult<()> {
    let mut claimed: BTreeMap<VersionId, BTreeSet<&str>> = BTreeMap::new();
    for (id, path) in files {
        claimed.entry(id).or_default().insert(path);
    }

    let new: BTreeSet<VersionId> = new.collect();
    for version in new {
        if let Some(paths) = claimed.get(&version).filter(|p| p.len() > 1) {
            return Err(Error::DuplicateVersion {
                version,
                paths: paths.iter().map(|p| p.to_string()).collect(),
            });
        }
    }

    Ok(())
}
