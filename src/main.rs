mod changelog;
mod cli;
mod config;
mod error;
mod model;
mod release;
mod tracker;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if cli::wants_help(&args) {
        cli::print_help();
        return Ok(());
    }

    let invocation = cli::parse_args(&args)?;
    cli::run(invocation).await
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the ticket summary
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
