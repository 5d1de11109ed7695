//! Slug-keyed JSON stores.
//!
//! One pretty-printed JSON file per series (`<slug>.json`) in a directory.
//! The filename-derived trees and the TMDB-derived structures live in two
//! separate stores because they are rebuilt on different triggers.

use crate::models::canonical::CanonicalSeries;
use crate::models::series::SeriesTree;
use crate::utils::fs::{create_dir_all, write_atomic};
use crate::utils::text::slugify;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A listed entry of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSeries {
    pub slug: String,
    pub display_name: String,
}

/// Types that can name themselves for store listings.
pub trait Named {
    fn display_name(&self) -> &str;
}

impl Named for SeriesTree {
    fn display_name(&self) -> &str {
        &self.series_name
    }
}

impl Named for CanonicalSeries {
    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Directory of `<slug>.json` blobs holding values of type `T`.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    dir: PathBuf,
    _marker: PhantomData<T>,
}

/// Store of filename-derived series trees.
pub type SeriesStore = JsonStore<SeriesTree>;

/// Store of TMDB-derived canonical structures.
pub type MetadataStore = JsonStore<CanonicalSeries>;

impl<T: Serialize + DeserializeOwned + Named> JsonStore<T> {
    /// Open a store rooted at `dir`, creating it if needed.
    pub fn open(dir: &Path) -> Result<Self> {
        create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            _marker: PhantomData,
        })
    }

    /// Path of the blob for a slug. Only keys `slugify` would produce are
    /// accepted, so a key can never name a file outside the store directory.
    fn path_for(&self, slug: &str) -> Result<PathBuf> {
        if !is_valid_slug(slug) {
            return Err(Error::InvalidSlug(slug.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", slug)))
    }

    /// Whether a blob exists for the slug.
    pub fn contains(&self, slug: &str) -> bool {
        self.path_for(slug).map(|p| p.exists()).unwrap_or(false)
    }

    /// Write a value under the slug, replacing any previous one.
    pub fn save_as(&self, slug: &str, value: &T) -> Result<PathBuf> {
        let path = self.path_for(slug)?;
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(&path, json.as_bytes())?;
        tracing::info!("Saved '{}' to {}", value.display_name(), path.display());
        Ok(path)
    }

    /// Read the value stored under the slug.
    ///
    /// Missing blobs are `SeriesNotFound`; unreadable or unparsable ones
    /// are `CorruptStore`. Keys that are not slugs are `InvalidSlug`.
    pub fn load(&self, slug: &str) -> Result<T> {
        let path = self.path_for(slug)?;
        if !path.exists() {
            return Err(Error::SeriesNotFound(slug.to_string()));
        }
        let content = fs::read_to_string(&path).map_err(|e| Error::CorruptStore {
            slug: slug.to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| Error::CorruptStore {
            slug: slug.to_string(),
            reason: e.to_string(),
        })
    }

    /// All stored entries sorted by slug.
    pub fn list(&self) -> Result<Vec<StoredSeries>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let display_name = match self.load(slug) {
                Ok(value) => value.display_name().to_string(),
                Err(e) => {
                    tracing::warn!("Listing unreadable entry {}: {}", slug, e);
                    slug.replace('_', " ")
                }
            };
            entries.push(StoredSeries {
                slug: slug.to_string(),
                display_name,
            });
        }

        entries.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(entries)
    }

    /// Remove the blob for the slug.
    pub fn delete(&self, slug: &str) -> Result<()> {
        let path = self.path_for(slug)?;
        if !path.exists() {
            tracing::warn!("Nothing to delete at {}", path.display());
            return Err(Error::SeriesNotFound(slug.to_string()));
        }
        fs::remove_file(&path)?;
        tracing::info!("Deleted {}", path.display());
        Ok(())
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && slugify(slug) == slug
}

impl JsonStore<SeriesTree> {
    /// Save a tree under the slug of its series name, pruning empty containers.
    pub fn save(&self, tree: &SeriesTree) -> Result<String> {
        let slug = slugify(&tree.series_name);
        let mut pruned = tree.clone();
        pruned.prune();
        self.save_as(&slug, &pruned)?;
        Ok(slug)
    }
}
