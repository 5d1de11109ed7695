//! Data models.

pub mod canonical;
pub mod config;
pub mod series;
