use clap::Parser;
use tracing_subscriber::EnvFilter;
use typebridge::cli::Cli;

/// Environment variable holding a log filter (e.g. `typebridge_typegen=trace`).
const LOG_ENV: &str = "TYPEBRIDGE_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    std::process::exit(typebridge::run(cli));
}

/// Logs go to stderr so generated code on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
