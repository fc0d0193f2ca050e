//! Entry point for the form translations command line tool.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use form_translations::cli::{
    Cli,
    run,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut stdout = std::io::stdout().lock();
    let result = run(cli, &mut stdout).and_then(|()| stdout.flush().map_err(Into::into));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (prefix, code) = if e.is_warning() { ("warning", 2) } else { ("error", 1) };
            let _ = writeln!(std::io::stderr().lock(), "{prefix}: {e}");
            ExitCode::from(code)
        }
    }
}
