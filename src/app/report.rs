use migseq_core::fixture::FixtureCheck;
use migseq_core::version::VersionId;
use migseq_core::{Config, MigrationCheck};

use chrono::{DateTime, Utc};
use display_json::{DebugAsJson, DisplayAsJsonPretty};
use serde::Serialize;

/// What a passing run found.
#[derive(Clone, Serialize, DebugAsJson, DisplayAsJsonPretty)]
pub struct Report {
    checked_at: DateTime<Utc>,
    config: Config,
    #[serde(skip_serializing_if = "Option::is_none")]
    migrations: Option<MigrationCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixtures: Option<FixtureCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<NextVersions>,
}

impl Report {
    pub(super) fn new(config: &Config) -> Self {
        Self {
            checked_at: Utc::now(),
            config: config.clone(),
            migrations: None,
            fixtures: None,
            next: None,
        }
    }

    pub(super) fn with_migrations(mut self, check: MigrationCheck) -> Self {
        self.migrations = Some(check);
        self
    }

    pub(super) fn with_fixtures(mut self, check: FixtureCheck) -> Self {
        self.fixtures = Some(check);
        self
    }

    pub(super) fn with_next(mut self, next: NextVersions) -> Self {
        self.next = Some(next);
        self
    }

    pub fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    pub fn migrations(&self) -> Option<&MigrationCheck> {
        self.migrations.as_ref()
    }

    pub fn fixtures(&self) -> Option<&FixtureCheck> {
        self.fixtures.as_ref()
    }

    pub fn next(&self) -> Option<&NextVersions> {
        self.next.as_ref()
    }

    /// Plain text lines summarizing the report.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(m) = &self.migrations {
            lines.push(format!(
                "migrations in {}: latest existing V{}",
                self.config.migration_root.display(),
                m.latest_existing
            ));
            if m.validated.is_empty() {
                lines.push("  no new migrations".to_string());
            }
            for v in &m.validated {
                lines.push(format!("  new V{v}"));
            }
        }
        if let Some(f) = &self.fixtures {
            lines.push(format!(
                "fixtures in {} ({:?} baseline)",
                self.config.fixtures_root.display(),
                self.config.minor_baseline
            ));
            if f.is_empty() {
                lines.push("  no new fixtures".to_string());
            }
            for (major, minors) in &f.minors {
                let ids: Vec<String> = minors
                    .iter()
                    .map(|minor| VersionId::fixture(*major, *minor).to_string())
                    .collect();
                lines.push(format!("  new {}", ids.join(", ")));
            }
        }
        if let Some(next) = &self.next {
            lines.push(format!("next migration V{}", next.migration));
            if let Some(fixture) = next.fixture {
                lines.push(format!("next fixture {fixture}"));
            }
        }

        lines
    }
}

/// The next free versions in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextVersions {
    /// One more than the highest migration major.
    pub migration: u64,
    /// The next fixture version for a requested major.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture: Option<VersionId>,
}
