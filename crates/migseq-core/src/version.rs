//! Version identifiers parsed out of migration and fixture filenames.
//!
//! A migration is named `V<major>__<description>.sql` and a fixture is named
//! `V<major>.<minor>__<description>.sql`.  Only the filename is matched; the
//! directories leading up to it are kept as the identifying path.
use crate::error::{Error, SeqResult};

use regex::Regex;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::sync::OnceLock;

fn filename_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^V(\d+)(?:\.(\d+))?__(.+)\.sql$").unwrap())
}

/// A major version, optionally paired with a minor version.
#[derive(Debug, Clone, Copy, Hash, PartialOrd, Ord, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct VersionId {
    major: u64,
    minor: Option<u64>,
}

impl VersionId {
    pub fn migration(major: u64) -> Self {
        Self { major, minor: None }
    }

    pub fn fixture(major: u64, minor: u64) -> Self {
        Self {
            major,
            minor: Some(minor),
        }
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> Option<u64> {
        self.minor
    }
}

impl Display for VersionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "V{}.{}", self.major, minor),
            None => write!(f, "V{}", self.major),
        }
    }
}

impl From<VersionId> for String {
    fn from(value: VersionId) -> Self {
        value.to_string()
    }
}

/// A migration file recognized by name.
#[derive(Debug, Clone, Hash, PartialOrd, Ord, PartialEq, Eq, Serialize)]
pub struct MigrationFile {
    pub version: u64,
    pub description: String,
    pub path: String,
}

impl MigrationFile {
    /// Parse a migration path.
    ///
    /// Anything that isn't named like a migration (including fixture-style
    /// `major.minor` names) is not a migration and yields `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let Some((major, minor, description)) = captures(path) else {
            log::debug!(target: "migseq", "skipping {path}: not a migration filename");
            return None;
        };
        if minor.is_some() {
            log::debug!(target: "migseq", "skipping {path}: versioned like a fixture");
            return None;
        }
        let Ok(version) = major.parse::<u64>() else {
            log::warn!(target: "migseq", "skipping {path}: version {major} out of range");
            return None;
        };

        Some(Self {
            version,
            description: description.to_string(),
            path: path.to_string(),
        })
    }

    pub fn id(&self) -> VersionId {
        VersionId::migration(self.version)
    }
}

/// A data fixture attached to a migration major.
#[derive(Debug, Clone, Hash, PartialOrd, Ord, PartialEq, Eq, Serialize)]
pub struct FixtureFile {
    pub major: u64,
    pub minor: u64,
    pub description: String,
    pub path: String,
}

impl FixtureFile {
    /// Parse a fixture path.  Unlike migrations, a name that does not match is
    /// an error.
    pub fn parse(path: &str) -> SeqResult<Self> {
        let invalid = || Error::UnparsableFixtureName(path.to_string());
        let (major, minor, description) = captures(path).ok_or_else(invalid)?;
        let minor = minor.ok_or_else(invalid)?;

        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
            description: description.to_string(),
            path: path.to_string(),
        })
    }

    pub fn id(&self) -> VersionId {
        VersionId::fixture(self.major, self.minor)
    }
}

/// Keep the paths that are migrations, dropping the rest.
pub fn parse_migrations<S: AsRef<str>>(paths: &[S]) -> Vec<MigrationFile> {
    paths
        .iter()
        .filter_map(|p| MigrationFile::parse(p.as_ref()))
        .collect()
}

/// Parse every path as a fixture, failing on the first that isn't one.
pub fn parse_fixtures<S: AsRef<str>>(paths: &[S]) -> SeqResult<Vec<FixtureFile>> {
    paths
        .iter()
        .map(|p| FixtureFile::parse(p.as_ref()))
        .collect()
}

fn captures(path: &str) -> Option<(&str, Option<&str>, &str)> {
    let filename = Path::new(path).file_name()?.to_str()?;
    let captures = filename_re().captures(filename)?;
    let major = captures.get(1)?.as_str();
    let minor = captures.get(2).map(|m| m.as_str());
    let description = captures.get(3)?.as_str();

    Some((major, minor, description))
}

#[cfg(test)]
mod tests {
    use super::{FixtureFile, MigrationFile, VersionId, parse_fixtures, parse_migrations};
    use crate::error::Error;

    #[test]
    fn migration_in_nested_directory() {
        let m = MigrationFile::parse("db/migration/2024/V12__add users.sql").unwrap();
        assert_eq!(m.version, 12);
        assert_eq!(m.description, "add users");
        assert_eq!(m.path, "db/migration/2024/V12__add users.sql");
    }

    #[test]
    fn non_migrations_are_dropped() {
        let paths = vec![
            "db/migration/README.md",
            "db/migration/V1__init.sql",
            "db/migration/V2_single_underscore.sql",
            "db/migration/v3__lowercase.sql",
            "db/migration/V4__wrong_ext.rs",
            "db/migration/V5.1__fixture_like.sql",
            "db/migration/V99999999999999999999999__overflow.sql",
            "db/migration/R__repeatable.sql",
        ];
        let versions: Vec<u64> = parse_migrations(&paths).iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1]);
    }

    #[test]
    fn fixture_major_minor() {
        let f = FixtureFile::parse("db/fixtures/V4.2__seed_users.sql").unwrap();
        assert_eq!((f.major, f.minor), (4, 2));
        assert_eq!(f.id(), VersionId::fixture(4, 2));
        assert_eq!(f.id().to_string(), "V4.2");
    }

    #[test]
    fn fixture_without_minor_is_an_error() {
        let res = FixtureFile::parse("db/fixtures/V4__seed.sql");
        assert!(matches!(res, Err(Error::UnparsableFixtureName(p)) if p == "db/fixtures/V4__seed.sql"));
    }

    #[test]
    fn fixture_parse_halts_on_first_bad_name() {
        let paths = vec![
            "db/fixtures/V4.1__a.sql",
            "db/fixtures/notes.txt",
            "db/fixtures/garbage",
        ];
        let res = parse_fixtures(&paths);
        assert!(matches!(res, Err(Error::UnparsableFixtureName(p)) if p == "db/fixtures/notes.txt"));
    }

    #[test]
    fn version_ordering() {
        let mut ids = vec![
            VersionId::fixture(2, 1),
            VersionId::migration(2),
            VersionId::fixture(1, 10),
            VersionId::fixture(1, 2),
        ];
        ids.sort();
        let rendered: Vec<String> = ids.into_iter().map(String::from).collect();
        assert_eq!(rendered, vec!["V1.2", "V1.10", "V2", "V2.1"]);
    }
}
