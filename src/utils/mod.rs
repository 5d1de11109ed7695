//! Shared utilities.

pub mod fs;
pub mod text;
