//! Series name normalization.
//!
//! Turns a free-text series name into the delimiter variants that release
//! filenames commonly use (`how.i.met.your.mother`, `how_i_met_your_mother`,
//! ...), plus diacritic-free counterparts for accented names.

use crate::utils::text::remove_diacritics;
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Separators substituted for whitespace runs, in output order.
const SEPARATORS: &[&str] = &[".", "_", "-", ""];

/// Delimiter variants of a single (already diacritic-resolved) name.
fn delimiter_variants(name: &str) -> Vec<String> {
    let base = name.trim().to_lowercase();
    let mut variants = vec![base.clone()];
    for sep in SEPARATORS {
        variants.push(WHITESPACE_RUN.replace_all(&base, *sep).into_owned());
    }
    variants
}

/// Ordered, duplicate-free name variants for querying.
///
/// The first pass keeps the name as written; the second pass adds the
/// diacritic-stripped form of each variant only where it differs.
pub fn name_variants(series_name: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();

    for variant in delimiter_variants(series_name) {
        if !variant.is_empty() && !variants.contains(&variant) {
            variants.push(variant);
        }
    }

    let stripped: Vec<String> = variants
        .iter()
        .map(|v| remove_diacritics(v))
        .filter(|s| !s.is_empty())
        .collect();
    for variant in stripped {
        if !variants.contains(&variant) {
            variants.push(variant);
        }
    }

    variants
}
