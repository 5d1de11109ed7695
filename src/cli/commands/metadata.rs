//! Metadata command implementations.

use crate::cli::args::MetadataAction;
use crate::core::catalog::Catalog;
use crate::models::config::Config;
use anyhow::{Context, Result};
use colored::Colorize;

/// Execute metadata subcommand.
pub async fn execute_metadata(config: &Config, action: MetadataAction) -> Result<()> {
    match action {
        MetadataAction::Lookup {
            title,
            pick,
            candidates,
        } => {
            if candidates {
                show_candidates(config, &title).await
            } else {
                lookup(config, &title, pick).await
            }
        }
        MetadataAction::List => list(config),
    }
}

async fn show_candidates(config: &Config, title: &str) -> Result<()> {
    let catalog = Catalog::from_config(config)?;
    let candidates = catalog.metadata_candidates(title).await?;

    if candidates.is_empty() {
        println!("{}", format!("[WARN] No TMDB results for '{}'", title).yellow());
        return Ok(());
    }

    println!("{}", format!("TMDB results for '{}'", title).bold().cyan());
    for (i, candidate) in candidates.iter().enumerate() {
        println!(
            "  {:>2}. {} {}",
            i,
            candidate.display_name().bold(),
            format!("(id {})", candidate.id).dimmed()
        );
    }
    println!();
    println!("  Use --pick <N> to store one of them.");
    Ok(())
}

async fn lookup(config: &Config, title: &str, pick: usize) -> Result<()> {
    println!("{}", format!("[METADATA] {}", title).bold().cyan());

    let catalog = Catalog::from_config(config)?;
    let canonical = catalog
        .lookup_metadata(title, pick)
        .await
        .with_context(|| format!("Metadata lookup for '{}' failed", title))?;

    println!("{}", "[METADATA] Complete!".bold().green());
    println!("  Title: {}", canonical.name);
    if canonical.original_name != canonical.name {
        println!("  Original title: {}", canonical.original_name);
    }
    for (number, season) in &canonical.seasons {
        println!(
            "  Season {:>2}: {} ({} episodes)",
            number,
            season.name,
            season.episodes.len()
        );
    }
    Ok(())
}

fn list(config: &Config) -> Result<()> {
    let catalog = Catalog::open(config)?;
    let entries = catalog.list_metadata()?;

    if entries.is_empty() {
        println!("No stored metadata.");
        return Ok(());
    }

    println!("{}", "Stored metadata".bold().cyan());
    for entry in &entries {
        println!("  {:<30} {}", entry.display_name.bold(), entry.slug.dimmed());
    }
    Ok(())
}
