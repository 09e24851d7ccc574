use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hookmint::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("HOOKMINT_LOG"))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    cli.run().await
}
