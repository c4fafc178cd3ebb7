mod api;
mod app;
mod cli;
mod config;
mod drop_zone;
mod error;
mod lister;
mod models;
mod terminal;
mod upload;
mod view;

#[cfg(test)]
mod testing;

use clap::Parser;
use tokio::task::LocalSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

// Views are single-threaded handles, so everything runs on one thread
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dropshare=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let local = LocalSet::new();
    if let Err(e) = local.run_until(cli::run_cli(cli)).await {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}
