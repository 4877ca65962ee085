use migseq::cli::CliOpts;
use std::process::ExitCode;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = CliOpts::new();
    match migseq::run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", console::style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}
