use crate::app::{Gate, GateOp, Report};

use migseq_cli::{CliOpts, Format, Opts, SourceOpts};
use migseq_core::error::{Error, SeqResult};
use migseq_core::source::NoChanges;
use migseq_source::{Filesystem, GitDiff};

/// Run the gate as directed by the parsed command line, printing the report
/// to stdout.
#[cfg_attr(docsrs, doc(cfg(feature = "cli")))]
pub fn run_cli(cli: CliOpts) -> SeqResult<()> {
    match cli.opts {
        Opts::Check {
            migrations_only,
            format,
            source,
            diff,
            rules,
        } => {
            let base = diff
                .required_base_ref()
                .map_err(|e| Error::Invalid(e.to_string()))?;
            let config = source.config(Some(&rules));
            let changes = GitDiff::new(&source.repo, base, &diff.head_ref).nested(source.nested);
            let op = if migrations_only {
                GateOp::CheckMigrations
            } else {
                GateOp::Check
            };

            let report = Gate::new(config, changes, tree(&source))
                .with_operation(op)
                .run()?;
            print_report(&report, format);
            Ok(())
        }
        Opts::Next {
            fixture_for,
            format,
            source,
        } => {
            let report = Gate::new(source.config(None), NoChanges, tree(&source))
                .with_operation(GateOp::NextVersion { fixture_for })
                .run()?;
            print_report(&report, format);
            Ok(())
        }
        Opts::New {
            description,
            fixture_for,
            source,
        } => {
            let path = Gate::new(source.config(None), NoChanges, tree(&source)).create(
                &source.repo,
                &description,
                fixture_for,
            )?;
            println!("Created {}", console::style(path.display()).cyan());
            Ok(())
        }
    }
}

fn tree(source: &SourceOpts) -> Filesystem {
    Filesystem::new(&source.repo).nested(source.nested)
}

fn print_report(report: &Report, format: Format) {
    match format {
        Format::Json => println!("{report}"),
        Format::Text => {
            for line in report.summary() {
                println!("{line}");
            }
            if report.next().is_none() {
                println!("{}", console::style("ok").green().bold());
            }
        }
    }
}
