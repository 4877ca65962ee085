use clap::{Args, Parser, ValueEnum};
use migseq_core::config::{DEFAULT_FIXTURES_ROOT, DEFAULT_MIGRATION_ROOT};
use migseq_core::{Config, DuplicatePolicy, MinorBaseline};
use std::path::PathBuf;

pub extern crate clap;

/// CI environment variable holding the target branch of a pull request.
pub const CI_BASE_REF_VAR: &str = "GITHUB_BASE_REF";

/// Validate that migration and fixture versions added on a branch continue the
/// existing sequence without gaps
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct CliOpts {
    #[clap(subcommand)]
    pub opts: Opts,
}

impl Default for CliOpts {
    fn default() -> Self {
        Self::new()
    }
}

impl CliOpts {
    /// Create a new [CliOpts] by parsing command line options.
    pub fn new() -> Self {
        Self::parse()
    }
}

/// Subcommands of the `migseq` CLI.
#[derive(Debug, Parser)]
pub enum Opts {
    /// Validate the migrations and fixtures added between two revisions
    Check {
        /// Only validate migrations
        #[arg(long)]
        migrations_only: bool,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        #[clap(flatten)]
        source: SourceOpts,
        #[clap(flatten)]
        diff: DiffOpts,
        #[clap(flatten)]
        rules: RuleOpts,
    },
    /// Print the next free migration version
    Next {
        /// Also print the next free fixture minor for this major
        #[arg(long)]
        fixture_for: Option<u64>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        #[clap(flatten)]
        source: SourceOpts,
    },
    /// Create an empty migration with the next free version
    New {
        /// Description of the migration
        description: String,
        /// Create a fixture for this major instead of a migration
        #[arg(long)]
        fixture_for: Option<u64>,
        #[clap(flatten)]
        source: SourceOpts,
    },
}

/// Where the migration and fixture files live.
#[derive(Debug, Args)]
pub struct SourceOpts {
    /// Path to the repository checkout
    #[clap(long, env = "MIGSEQ_REPO", default_value = ".")]
    pub repo: PathBuf,
    /// Folder containing migrations, relative to the repository
    #[clap(long, env = "MIGSEQ_MIGRATION_ROOT", default_value = DEFAULT_MIGRATION_ROOT)]
    pub migration_root: PathBuf,
    /// Folder containing fixtures, relative to the repository
    #[clap(long, env = "MIGSEQ_FIXTURES_ROOT", default_value = DEFAULT_FIXTURES_ROOT)]
    pub fixtures_root: PathBuf,
    /// Include files in subdirectories of the roots
    #[arg(long)]
    pub nested: bool,
}

impl SourceOpts {
    /// The validator configuration for these options.
    pub fn config(&self, rules: Option<&RuleOpts>) -> Config {
        let config = Config::default()
            .with_migration_root(&self.migration_root)
            .with_fixtures_root(&self.fixtures_root)
            .nested(self.nested);
        match rules {
            Some(rules) => config
                .with_minor_baseline(rules.minor_baseline.into())
                .with_duplicates(if rules.allow_duplicates {
                    DuplicatePolicy::Collapse
                } else {
                    DuplicatePolicy::Reject
                }),
            None => config,
        }
    }
}

/// The revisions to compare.
#[derive(Debug, Args)]
pub struct DiffOpts {
    /// Base revision of the change; falls back to `origin/$GITHUB_BASE_REF`
    #[clap(long, env = "MIGSEQ_BASE_REF")]
    pub base_ref: Option<String>,
    /// Head revision of the change
    #[clap(long, env = "MIGSEQ_HEAD_REF", default_value = "HEAD")]
    pub head_ref: String,
}

impl DiffOpts {
    pub fn required_base_ref(&self) -> anyhow::Result<String> {
        resolve_base_ref(self.base_ref.as_deref(), std::env::var(CI_BASE_REF_VAR).ok())
    }
}

fn resolve_base_ref(explicit: Option<&str>, ci: Option<String>) -> anyhow::Result<String> {
    match (explicit, ci) {
        (Some(base), _) => Ok(base.to_string()),
        (None, Some(branch)) if !branch.trim().is_empty() => {
            Ok(format!("origin/{}", branch.trim()))
        }
        _ => Err(anyhow::anyhow!(
            "the `--base-ref` option or one of the `MIGSEQ_BASE_REF` or `{CI_BASE_REF_VAR}` environment variables must be provided"
        )),
    }
}

/// How strictly to validate.
#[derive(Debug, Args)]
pub struct RuleOpts {
    /// Where the first expected fixture minor of a major starts
    #[arg(long, value_enum, default_value_t = Baseline::Continuation)]
    pub minor_baseline: Baseline,
    /// Fold files sharing a version together instead of failing
    #[arg(long)]
    pub allow_duplicates: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Baseline {
    /// Minors start at 1 for every major
    Fresh,
    /// Minors continue from the highest one already recorded
    Continuation,
}

impl From<Baseline> for MinorBaseline {
    fn from(value: Baseline) -> Self {
        match value {
            Baseline::Fresh => MinorBaseline::Fresh,
            Baseline::Continuation => MinorBaseline::Continuation,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::{CliOpts, Format, Opts, resolve_base_ref};
    use clap::Parser;
    use migseq_core::{DuplicatePolicy, MinorBaseline};
    use std::path::PathBuf;

    #[test]
    fn check_defaults() {
        let cli = CliOpts::try_parse_from(["migseq", "check", "--base-ref", "main"]).unwrap();
        let Opts::Check {
            migrations_only,
            format,
            source,
            diff,
            rules,
        } = cli.opts
        else {
            panic!("expected check");
        };
        assert!(!migrations_only);
        assert_eq!(format, Format::Text);
        assert_eq!(diff.base_ref.as_deref(), Some("main"));
        assert_eq!(diff.head_ref, "HEAD");

        let config = source.config(Some(&rules));
        assert_eq!(config.migration_root, PathBuf::from("db/migration"));
        assert_eq!(config.fixtures_root, PathBuf::from("db/fixtures"));
        assert_eq!(config.minor_baseline, MinorBaseline::Continuation);
        assert_eq!(config.duplicates, DuplicatePolicy::Reject);
        assert!(!config.nested_directories);
    }

    #[test]
    fn check_overrides() {
        let cli = CliOpts::try_parse_from([
            "migseq",
            "check",
            "--migration-root",
            "sql/schema",
            "--nested",
            "--minor-baseline",
            "fresh",
            "--allow-duplicates",
            "--format",
            "json",
        ])
        .unwrap();
        let Opts::Check {
            format,
            source,
            rules,
            ..
        } = cli.opts
        else {
            panic!("expected check");
        };
        assert_eq!(format, Format::Json);
        let config = source.config(Some(&rules));
        assert_eq!(config.migration_root, PathBuf::from("sql/schema"));
        assert_eq!(config.minor_baseline, MinorBaseline::Fresh);
        assert_eq!(config.duplicates, DuplicatePolicy::Collapse);
        assert!(config.nested_directories);
    }

    #[test]
    fn new_fixture() {
        let cli =
            CliOpts::try_parse_from(["migseq", "new", "seed users", "--fixture-for", "4"]).unwrap();
        assert!(matches!(
            cli.opts,
            Opts::New { ref description, fixture_for: Some(4), .. } if description == "seed users"
        ));
    }

    #[test]
    fn base_ref_resolution() {
        assert_eq!(resolve_base_ref(Some("main"), None).unwrap(), "main");
        assert_eq!(
            resolve_base_ref(Some("main"), Some("develop".into())).unwrap(),
            "main"
        );
        assert_eq!(
            resolve_base_ref(None, Some("develop".into())).unwrap(),
            "origin/develop"
        );
        assert!(resolve_base_ref(None, Some(" ".into())).is_err());
        assert!(resolve_base_ref(None, None).is_err());
    }
}
