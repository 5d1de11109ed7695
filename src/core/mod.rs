//! Core business logic modules.

pub mod aggregator;
pub mod catalog;
pub mod classifier;
pub mod metadata;
pub mod normalizer;
pub mod query;
pub mod store;
pub mod tree;
