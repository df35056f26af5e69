use std::process::ExitCode;
use torexit::cli::{Args, USAGE};
use torexit::Outcome;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = match Args::parse_normalized(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();

    let (out, files) = match args.job() {
        Some(job) => job,
        None => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
    };

    match torexit::run(out, files) {
        Ok(Outcome::Written { .. }) => ExitCode::SUCCESS,
        Ok(Outcome::NoAddresses) => {
            println!("No IP addresses");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "aborted");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
