use std::error::Error as StdError;
use std::path::PathBuf;

use crate::version::VersionId;

/// Alias for a result whose error type is [`Error`].
pub type SeqResult<T> = Result<T, Error>;
type BoxDynError = Box<dyn StdError + Send + Sync + 'static>;

/// All the ways a validation run can end in failure.
///
/// Every variant is terminal for the run: the gate either fully passes or
/// fully blocks.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured migration directory does not exist.
    #[error("migration root {} does not exist", .0.display())]
    MissingMigrationRoot(PathBuf),
    /// A new fixture file does not match `V<major>.<minor>__<description>.sql`.
    #[error("fixture {0} does not match `V<major>.<minor>__<description>.sql`")]
    UnparsableFixtureName(String),
    /// A new migration is not exactly one greater than the running expectation.
    #[error("migration sequence gap: expected V{expected} but found V{found}")]
    SequenceGap { expected: u64, found: u64 },
    /// A new fixture references a major that is neither the latest existing
    /// migration nor one introduced in this change.
    #[error("fixture {path} has invalid major version {major}, allowed majors are {allowed:?}")]
    InvalidFixtureMajor {
        path: String,
        major: u64,
        allowed: Vec<u64>,
    },
    /// A new fixture minor is not the next expected value for its major.
    #[error("fixture minor gap for V{major}: expected minor {expected} but found {found}")]
    MinorGap { major: u64, expected: u64, found: u64 },
    /// More than one file claims the same version.
    #[error("duplicate version {version} in {}", .paths.join(", "))]
    DuplicateVersion {
        version: VersionId,
        paths: Vec<String>,
    },
    /// A collaborator (version control, filesystem) failed to produce a listing.
    #[error("could not list {0}: {1}")]
    Source(String, #[source] BoxDynError),
    /// Invalid arguments for the requested operation.
    #[error("invalid arguments: {0}")]
    Invalid(String),
}

impl Error {
    /// Whether this error is a verdict on the files themselves, as opposed to a
    /// failure to discover them.
    pub fn is_violation(&self) -> bool {
        matches!(
            self,
            Self::UnparsableFixtureName(_)
                | Self::SequenceGap { .. }
                | Self::InvalidFixtureMajor { .. }
                | Self::MinorGap { .. }
                | Self::DuplicateVersion { .. }
        )
    }
}

/// Converting a result with a generic `std::error::Error` from a collaborator
/// to one with this crate's error type.
pub trait SourceError<T, E> {
    /// Box the error as [`Error::Source`], naming what was being listed.
    fn source_result(self, what: &str) -> SeqResult<T>;
}

impl<T, E> SourceError<T, E> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn source_result(self, what: &str) -> SeqResult<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::Source(what.to_string(), Box::new(e))),
        }
    }
}
