//! Usher CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use usher::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Up(args) => usher::cli::commands::up::execute(args, cli.config, cli.json).await,
        Commands::Preflight(args) => {
            usher::cli::commands::preflight::execute(args, cli.config, cli.json).await
        }
        Commands::Config(args) => {
            usher::cli::commands::config::execute(args, cli.config, cli.json).await
        }
    };

    if let Err(err) = result {
        usher::cli::handle_error(err, cli.json);
    }
}
