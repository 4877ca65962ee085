//! The core of the version sequence gate.
//!
//! Given the migration and fixture files that existed before a change and the
//! ones the change adds, [`validate::Validator`] decides whether the new
//! versions continue the existing sequence without gaps.  Discovering those
//! files is left to implementations of the traits in [`source`].
pub mod config;
pub mod error;
pub mod fixture;
pub mod partition;
pub mod sequence;
pub mod source;
pub mod validate;
pub mod version;

pub use config::{Config, DuplicatePolicy, MinorBaseline};
pub use error::{Error, SeqResult};
pub use validate::{MigrationCheck, Validator, Verdict};
