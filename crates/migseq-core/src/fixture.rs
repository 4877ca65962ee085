//! Validation of new fixture files against the migration majors they attach to.
//!
//! This happens in two phases.  First every new fixture must reference an
//! allowed major: the latest migration that existed before the change, or one
//! the change introduces.  Then, per major, the new minors have to continue
//! without gaps from the baseline selected by [`MinorBaseline`].
use crate::config::MinorBaseline;
use crate::error::{Error, SeqResult};
use crate::partition::VersionSet;
use crate::sequence::next_version;
use crate::version::FixtureFile;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// The majors a new fixture may reference.
pub fn allowed_majors(latest_existing: u64, new_majors: &VersionSet) -> VersionSet {
    let mut allowed = new_majors.clone();
    allowed.insert(latest_existing);
    allowed
}

/// New fixture minors that passed, grouped by major.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixtureCheck {
    pub minors: BTreeMap<u64, Vec<u64>>,
}

impl FixtureCheck {
    pub fn is_empty(&self) -> bool {
        self.minors.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FixtureValidator<'a> {
    allowed: &'a VersionSet,
    baseline: MinorBaseline,
    /// Highest minor on record per major.
    history: BTreeMap<u64, u64>,
}

impl<'a> FixtureValidator<'a> {
    pub fn new(allowed: &'a VersionSet, baseline: MinorBaseline) -> Self {
        Self {
            allowed,
            baseline,
            history: BTreeMap::new(),
        }
    }

    /// Record the fixtures that existed before the change.  These only matter
    /// for [`MinorBaseline::Continuation`].
    pub fn with_history<'f, I>(mut self, existing: I) -> Self
    where
        I: IntoIterator<Item = &'f FixtureFile>,
    {
        for f in existing {
            let max = self.history.entry(f.major).or_default();
            *max = (*max).max(f.minor);
        }
        self
    }

    /// The first minor expected for new fixtures of `major`.
    pub fn first_minor(&self, major: u64) -> SeqResult<u64> {
        match self.baseline {
            MinorBaseline::Fresh => Ok(1),
            MinorBaseline::Continuation => {
                next_version(self.history.get(&major).copied().unwrap_or(0))
            }
        }
    }

    pub fn validate(&self, new: &[FixtureFile]) -> SeqResult<FixtureCheck> {
        let mut sorted: Vec<&FixtureFile> = new.iter().collect();
        sorted.sort();

        self.check_membership(&sorted)?;

        let mut grouped: BTreeMap<u64, BTreeSet<u64>> = BTreeMap::new();
        for f in &sorted {
            grouped.entry(f.major).or_default().insert(f.minor);
        }

        let mut check = FixtureCheck::default();
        for (major, minors) in grouped {
            let mut expected = self.first_minor(major)?;
            log::debug!(
                target: "migseq",
                "fixtures for V{major}: {} new, first expected minor {expected}",
                minors.len(),
            );
            for &found in &minors {
                if found != expected {
                    return Err(Error::MinorGap {
                        major,
                        expected,
                        found,
                    });
                }
                // `minors` is a set, so nothing follows `u64::MAX`.
                expected = found.saturating_add(1);
            }
            check.minors.insert(major, minors.into_iter().collect());
        }

        Ok(check)
    }

    fn check_membership(&self, sorted: &[&FixtureFile]) -> SeqResult<()> {
        match sorted.iter().find(|f| !self.allowed.contains(f.major)) {
            Some(f) => Err(Error::InvalidFixtureMajor {
                path: f.path.clone(),
                major: f.major,
                allowed: self.allowed.to_vec(),
            }),
            None => Ok(()),
        }
    }
}
