//! cellar - resolve application secrets from a remote vault in one batch

mod cli;
mod commands;
mod output;

use anyhow::Result;
use cellar_secrets::{MemoryCache, SecretCache};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // rustls 0.23 needs a process-wide crypto provider before any TLS use
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();

    // Shared by every resolution this process performs
    let cache: Arc<dyn SecretCache> = Arc::new(MemoryCache::new());

    match cli.command {
        Commands::Version(args) => commands::version::run(args),
        Commands::Config(cmd) => commands::config::run(cmd, config),
        Commands::Resolve(args) => commands::resolve::run(args, config, cache).await,
        Commands::Token(args) => commands::token::run(args, config, cache).await,
        Commands::Env(args) => commands::env::run(args, config, cache).await,
    }
}

/// Logs go to stderr so command output can be piped
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::new(level))
        .init();
}
