//! Series Catalog CLI
//!
//! A command-line tool for building TV series episode catalogs from Webshare
//! search results, with optional episode names from TMDB.

use clap::Parser;
use series_catalog::cli::{
    args::{Cli, Commands},
    commands::{metadata, series},
};
use series_catalog::models::config::{load_config, Config};
use series_catalog::preflight::{self, Service};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    // Run preflight checks for the services the command uses
    if !cli.skip_preflight {
        let mut services = Vec::new();
        if cli.command.needs_search() {
            services.push(Service::Webshare);
        }
        if cli.command.needs_metadata() {
            services.push(Service::Tmdb);
        }
        if !services.is_empty() {
            run_preflight_checks(&config, &services).await?;
        }
    }

    // Ctrl-C stops issuing further queries
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping search");
            signal_token.cancel();
        }
    });

    // Run the appropriate command
    match cli.command {
        Commands::Search { name } => {
            series::search(&config, &name, &cancel).await?;
        }

        Commands::Refresh { name } => {
            series::refresh(&config, &name, &cancel).await?;
        }

        Commands::List => {
            series::list(&config)?;
        }

        Commands::Seasons { name } => {
            series::seasons(&config, &name)?;
        }

        Commands::Episodes { name, season } => {
            series::episodes(&config, &name, season)?;
        }

        Commands::Delete { slug } => {
            series::delete(&config, &slug)?;
        }

        Commands::Metadata { action } => {
            metadata::execute_metadata(&config, action).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("series_catalog=debug")
    } else {
        EnvFilter::new("series_catalog=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(config: &Config, services: &[Service]) -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config, services).await?;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
