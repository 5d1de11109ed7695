//! Series Catalog Library
//!
//! Builds a catalog of TV series episodes from a file-sharing search service:
//! name variants and query expansion, filename classification into
//! season/episode coordinates, per-series JSON stores and optional canonical
//! metadata from TMDB.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
