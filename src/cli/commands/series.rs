//! Series command implementations.

use crate::core::catalog::Catalog;
use crate::models::config::Config;
use crate::models::series::SeriesTree;
use crate::utils::text::format_size;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

fn query_progress() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} queries")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}

fn print_tree_summary(tree: &SeriesTree) {
    println!(
        "  Found {} episodes in {} seasons",
        tree.episode_count(),
        tree.seasons.len()
    );
    println!(
        "  Seasons: {}",
        tree.seasons
            .keys()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Files: {}", tree.variant_count());
}

/// Search a series and store the result.
pub async fn search(config: &Config, name: &str, cancel: &CancellationToken) -> Result<()> {
    println!("{}", format!("[SEARCH] {}", name).bold().cyan());

    let pb = query_progress();
    let catalog = Catalog::from_config(config)
        .context("Failed to open series catalog")?
        .with_progress(pb.clone());
    let result = catalog.search_series(name, cancel).await;
    pb.finish_and_clear();

    match result {
        Ok(tree) => {
            println!("{}", "[SEARCH] Complete!".bold().green());
            print_tree_summary(&tree);
            Ok(())
        }
        Err(e) if e.is_no_content() => {
            println!("{}", format!("[WARN] {}", e).yellow());
            println!("  Nothing was stored. Try a different spelling.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Refresh a stored series.
pub async fn refresh(config: &Config, name: &str, cancel: &CancellationToken) -> Result<()> {
    println!("{}", format!("[REFRESH] {}", name).bold().cyan());

    let pb = query_progress();
    let catalog = Catalog::from_config(config)
        .context("Failed to open series catalog")?
        .with_progress(pb.clone());
    let result = catalog.refresh_series(name, cancel).await;
    pb.finish_and_clear();

    match result {
        Ok(tree) => {
            println!("{}", "[REFRESH] Complete!".bold().green());
            print_tree_summary(&tree);
            Ok(())
        }
        Err(e) if e.is_no_content() => {
            println!("{}", format!("[WARN] {}", e).yellow());
            println!("  The stored tree was left unchanged.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// List stored series.
pub fn list(config: &Config) -> Result<()> {
    let catalog = Catalog::open(config)?;
    let entries = catalog.list_series()?;

    if entries.is_empty() {
        println!("No stored series. Use `search` to add one.");
        return Ok(());
    }

    println!("{}", "Stored series".bold().cyan());
    println!("{}", "=".repeat(50));
    for entry in &entries {
        println!("  {:<30} {}", entry.display_name.bold(), entry.slug.dimmed());
    }
    println!();
    println!("  Total: {}", entries.len());
    Ok(())
}

/// List seasons of a stored series.
pub fn seasons(config: &Config, name: &str) -> Result<()> {
    let catalog = Catalog::open(config)?;
    let seasons = catalog.get_seasons(name)?;

    println!("{}", name.bold().cyan());
    for season in seasons {
        println!("  Season {}", season);
    }
    Ok(())
}

/// List episodes of a season with their file variants.
pub fn episodes(config: &Config, name: &str, season: u32) -> Result<()> {
    let catalog = Catalog::open(config)?;
    let listings = catalog.get_episodes(name, season)?;

    println!("{}", format!("{} - Season {}", name, season).bold().cyan());
    println!("{}", "-".repeat(50));
    for listing in listings {
        let header = match &listing.title {
            Some(title) => format!("S{:02}E{:02} {}", season, listing.episode, title),
            None => format!("S{:02}E{:02}", season, listing.episode),
        };
        println!("{}", header.bold());
        for variant in &listing.variants {
            println!(
                "    {} {} {}",
                format!("[{}]", format_size(variant.size_bytes)).green(),
                variant.name,
                variant.ident.dimmed()
            );
        }
    }
    Ok(())
}

/// Delete a stored series by slug.
pub fn delete(config: &Config, slug: &str) -> Result<()> {
    let catalog = Catalog::open(config)?;
    catalog
        .delete_series(slug)
        .with_context(|| format!("Failed to delete '{}'", slug))?;
    println!("{} Deleted {}", "[OK]".green(), slug);
    Ok(())
}
