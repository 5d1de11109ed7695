//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Series Catalog - Build episode catalogs from Webshare search results
#[derive(Parser, Debug)]
#[command(name = "series-catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    /// Path to config.toml (default: platform config dir)
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a series and store its episode tree
    Search {
        /// Series name
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Rebuild the stored tree of a series
    Refresh {
        /// Series name
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// List stored series
    List,

    /// List the seasons of a stored series
    Seasons {
        /// Series name
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// List the episodes of a season
    Episodes {
        /// Series name
        #[arg(value_name = "NAME")]
        name: String,

        /// Season number
        #[arg(value_name = "SEASON")]
        season: u32,
    },

    /// Delete a stored series
    Delete {
        /// Slug as shown by `list`
        #[arg(value_name = "SLUG")]
        slug: String,
    },

    /// Canonical series metadata from TMDB
    Metadata {
        #[command(subcommand)]
        action: MetadataAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum MetadataAction {
    /// Look a title up and store its season/episode names
    Lookup {
        /// Series title
        #[arg(value_name = "TITLE")]
        title: String,

        /// Index of the search result to use
        #[arg(long, default_value_t = 0)]
        pick: usize,

        /// Only list the candidates
        #[arg(long)]
        candidates: bool,
    },

    /// List stored metadata
    List,
}

impl Commands {
    /// Whether the command talks to the search backend.
    pub fn needs_search(&self) -> bool {
        matches!(self, Commands::Search { .. } | Commands::Refresh { .. })
    }

    /// Whether the command talks to the metadata backend.
    pub fn needs_metadata(&self) -> bool {
        matches!(
            self,
            Commands::Metadata {
                action: MetadataAction::Lookup { .. }
            }
        )
    }
}
