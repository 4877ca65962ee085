//! Splitting the known migration majors into those that existed before the
//! change and those the change introduces.
use serde::Serialize;
use std::collections::BTreeSet;

/// An ordered set of major versions.
///
/// Membership ignores order, but iteration is always ascending, which is
/// the order the continuity checks walk in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionSet(BTreeSet<u64>);

impl VersionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: u64) -> bool {
        self.0.insert(version)
    }

    pub fn contains(&self, version: u64) -> bool {
        self.0.contains(&version)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }

    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.difference(&other.0).copied().collect())
    }

    /// The greatest version in the set.
    pub fn max(&self) -> Option<u64> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }

    /// Versions in ascending order.
    pub fn to_vec(&self) -> Vec<u64> {
        self.iter().collect()
    }
}

impl FromIterator<u64> for VersionSet {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The result of partitioning all known majors against the new ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    existing: VersionSet,
    new: VersionSet,
}

impl Partition {
    /// `existing` is everything known minus what was newly added.
    pub fn new(all_known: &VersionSet, new: &VersionSet) -> Self {
        let existing = all_known.difference(new);
        log::debug!(
            target: "migseq",
            "partitioned {} known majors into {} existing and {} new",
            all_known.len(),
            existing.len(),
            new.len(),
        );

        Self {
            existing,
            new: new.clone(),
        }
    }

    pub fn existing(&self) -> &VersionSet {
        &self.existing
    }

    pub fn new_majors(&self) -> &VersionSet {
        &self.new
    }

    /// The highest pre-existing major, or 0 when there were no migrations
    /// before this change.
    pub fn latest_existing(&self) -> u64 {
        self.existing.max().unwrap_or(0)
    }
}
