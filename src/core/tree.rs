//! Series tree builder.
//!
//! Folds classified results into `season -> episode -> [variants]`.
//! Unresolved filenames are dropped. Variant lists keep insertion order in
//! storage; display order is applied when reading.

use super::classifier;
use crate::models::series::{EpisodeCoordinate, EpisodeFileVariant, RawResult, SeriesTree};
use crate::utils::fs::container_rank;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;

/// Classify every result and build a tree stamped with the current time.
pub fn build(series_name: &str, results: &[RawResult]) -> SeriesTree {
    build_at(series_name, results, Utc::now())
}

/// Build with an explicit timestamp.
pub fn build_at(series_name: &str, results: &[RawResult], built_at: DateTime<Utc>) -> SeriesTree {
    let classified: Vec<(EpisodeCoordinate, &RawResult)> = results
        .iter()
        .map(|raw| (classifier::classify(&raw.name, &raw.name_variant), raw))
        .collect();
    build_from_classified(series_name, &classified, built_at)
}

/// Fold pre-classified results into a tree.
pub fn build_from_classified(
    series_name: &str,
    classified: &[(EpisodeCoordinate, &RawResult)],
    built_at: DateTime<Utc>,
) -> SeriesTree {
    let mut tree = SeriesTree {
        series_name: series_name.to_string(),
        last_updated: built_at,
        seasons: Default::default(),
    };
    let mut dropped = 0usize;

    for (coordinate, raw) in classified {
        let Some((season, episode)) = coordinate.pair() else {
            tracing::debug!("Unresolved: {}", raw.name);
            dropped += 1;
            continue;
        };

        let variants = tree
            .seasons
            .entry(season)
            .or_default()
            .entry(episode)
            .or_default();
        if variants
            .iter()
            .any(|v| v.name == raw.name && v.ident == raw.ident)
        {
            continue;
        }
        variants.push(EpisodeFileVariant::from(*raw));
    }

    tree.prune();
    tracing::info!(
        "Built '{}': {} seasons, {} episodes, {} files ({} unresolved)",
        series_name,
        tree.seasons.len(),
        tree.episode_count(),
        tree.variant_count(),
        dropped
    );
    tree
}

/// Display order: preferred container first, then larger files first.
pub fn ordered_variants(variants: &[EpisodeFileVariant]) -> Vec<EpisodeFileVariant> {
    let mut ordered = variants.to_vec();
    ordered.sort_by_key(|v| (container_rank(&v.name), Reverse(v.size_bytes)));
    ordered
}

/// Season numbers in ascending order.
pub fn season_numbers(tree: &SeriesTree) -> Vec<u32> {
    tree.seasons.keys().copied().collect()
}

/// Episodes of a season in ascending order with display-ordered variants.
pub fn season_episodes(tree: &SeriesTree, season: u32) -> Option<Vec<(u32, Vec<EpisodeFileVariant>)>> {
    tree.seasons.get(&season).map(|episodes| {
        episodes
            .iter()
            .map(|(episode, variants)| (*episode, ordered_variants(variants)))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, ident: &str, size: u64) -> RawResult {
        RawResult {
            name: name.to_string(),
            ident: ident.to_string(),
            size,
            source_query: "show".to_string(),
            name_variant: "show".to_string(),
        }
    }

    #[test]
    fn test_build_groups_by_coordinate() {
        let results = vec![
            raw("Show.S01E01.mkv", "a", 10),
            raw("Show.S01E02.mkv", "b", 10),
            raw("Show 1x02 720p.avi", "c", 5),
            raw("Show.S02E01.mp4", "d", 7),
        ];
        let tree = build("Show", &results);

        assert_eq!(season_numbers(&tree), vec![1, 2]);
        assert_eq!(tree.seasons[&1][&2].len(), 2);
        assert_eq!(tree.episode_count(), 3);
        assert_eq!(tree.variant_count(), 4);
    }

    #[test]
    fn test_unresolved_dropped() {
        let results = vec![
            raw("Show Best Of Compilation.mkv", "x", 10),
            raw("Show.S01E01.mkv", "a", 10),
        ];
        let tree = build("Show", &results);
        assert_eq!(tree.variant_count(), 1);
        assert!(!tree.seasons.contains_key(&0));
    }

    #[test]
    fn test_all_unresolved_gives_empty_tree() {
        let tree = build("Show", &[raw("Show Trailer.mkv", "x", 1)]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_duplicate_identity_collapses() {
        let results = vec![
            raw("Show.S01E01.mkv", "a", 10),
            raw("Show.S01E01.mkv", "a", 10),
            raw("Show.S01E01.mkv", "other", 10),
        ];
        let tree = build("Show", &results);
        assert_eq!(tree.seasons[&1][&1].len(), 2);
    }

    #[test]
    fn test_ordered_variants() {
        let variants = vec![
            EpisodeFileVariant {
                name: "a.avi".to_string(),
                ident: "1".to_string(),
                size_bytes: 500 * 1024 * 1024,
            },
            EpisodeFileVariant {
                name: "b.mkv".to_string(),
                ident: "2".to_string(),
                size_bytes: 300 * 1024 * 1024,
            },
            EpisodeFileVariant {
                name: "c.mkv".to_string(),
                ident: "3".to_string(),
                size_bytes: 900 * 1024 * 1024,
            },
        ];
        let names: Vec<String> = ordered_variants(&variants)
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["c.mkv", "b.mkv", "a.avi"]);
    }

    #[test]
    fn test_unknown_container_sorts_last() {
        let variants = vec![
            EpisodeFileVariant {
                name: "huge.wmv".to_string(),
                ident: "1".to_string(),
                size_bytes: 9_000,
            },
            EpisodeFileVariant {
                name: "small.mov".to_string(),
                ident: "2".to_string(),
                size_bytes: 1,
            },
        ];
        assert_eq!(ordered_variants(&variants)[0].name, "small.mov");
    }

    #[test]
    fn test_storage_order_untouched() {
        let results = vec![raw("Show.S01E01.avi", "a", 1), raw("Show.S01E01.mkv", "b", 1)];
        let tree = build("Show", &results);
        assert_eq!(tree.seasons[&1][&1][0].name, "Show.S01E01.avi");
        let episodes = season_episodes(&tree, 1).unwrap();
        assert_eq!(episodes[0].1[0].name, "Show.S01E01.mkv");
        assert!(season_episodes(&tree, 7).is_none());
    }
}
