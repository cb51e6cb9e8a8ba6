use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use student_forecast::commands::Cli;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Single-threaded runtime: one request is in flight at a time
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async { cli.execute().await })
}
