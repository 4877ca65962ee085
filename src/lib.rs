//! `migseq` checks in CI that the schema migrations and data fixtures a branch
//! adds continue the existing version sequence without gaps.
//!
//! Migrations are named `V<major>__<description>.sql` and must be numbered
//! consecutively from the highest major that existed before the change.
//! Fixtures are named `V<major>.<minor>__<description>.sql`, may only attach to
//! the latest existing major or one the change introduces, and their minors
//! must be consecutive per major.
//!
//! ```no_run
//! use migseq::source::{Filesystem, GitDiff};
//! use migseq::{Config, Gate};
//!
//! let changes = GitDiff::new(".", "origin/main", "HEAD");
//! let report = Gate::new(Config::default(), changes, Filesystem::new(".")).run()?;
//! println!("{report}");
//! # Ok::<(), migseq::Error>(())
//! ```
mod app;
pub use app::{Gate, GateOp, NextVersions, Report};

#[cfg(feature = "cli")]
pub use app::run_cli;
#[cfg(feature = "cli")]
pub use migseq_cli as cli;

pub use migseq_core::{
    Config, DuplicatePolicy, Error, MigrationCheck, MinorBaseline, SeqResult, Validator, Verdict,
};

pub mod error {
    pub use migseq_core::error::{Error, SeqResult, SourceError};
}

pub mod source {
    pub use migseq_core::source::{ChangeSource, Inputs, NoChanges, TreeSource};
    pub use migseq_source::{Filesystem, GitDiff, GitError};
}

pub mod version {
    pub use migseq_core::fixture::{FixtureCheck, FixtureValidator, allowed_majors};
    pub use migseq_core::partition::{Partition, VersionSet};
    pub use migseq_core::sequence::{SequenceCheck, validate_sequence};
    pub use migseq_core::version::{
        FixtureFile, MigrationFile, VersionId, parse_fixtures, parse_migrations,
    };
}
