//! Search query expansion.

use super::normalizer::name_variants;

/// Suffix templates appended to every name variant.
pub const QUERY_SUFFIXES: &[&str] = &[
    "",
    " season",
    " episode",
    " tv show",
    " full series",
    " s01",
    " season 1",
];

/// A query string and the name variant it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedQuery {
    pub text: String,
    pub name_variant: String,
}

/// Queries for one name variant.
pub fn expand_variant(variant: &str) -> Vec<ExpandedQuery> {
    QUERY_SUFFIXES
        .iter()
        .map(|suffix| ExpandedQuery {
            text: format!("{}{}", variant, suffix),
            name_variant: variant.to_string(),
        })
        .collect()
}

/// All queries for a series name: every variant times every suffix.
pub fn build_queries(series_name: &str) -> Vec<ExpandedQuery> {
    name_variants(series_name)
        .iter()
        .flat_map(|v| expand_variant(v))
        .collect()
}
