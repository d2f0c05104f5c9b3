//! composer-registry CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use composer_cli::{Cli, Commands, cmd};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    tracing::debug!("Using registry at {} ({})", config.root.display(), config.index_key);

    match cli.command {
        Commands::Init { force } => cmd::init::init(&config, force).await,
        Commands::Add { files } => cmd::add::add(&config, &files).await,
        Commands::Show { package } => cmd::show::show(&config, package.as_deref()).await,
    }
}
