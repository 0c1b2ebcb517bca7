//! fuzzrig - fuzzing scaffolds and throwaway fuzzing boxes

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fuzzrig_cli::cli::Cli;

fn init_tracing(verbose: bool) {
    let default = if verbose { "fuzzrig_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = cli.run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
