//! Episode classifier.
//!
//! Extracts `(season, episode)` from noisy release filenames using an
//! ordered rule table evaluated first-match-wins. Specific patterns come
//! first so broader ones (bare `E12`, `1.01`) cannot shadow them:
//!
//! | # | Rule            | Example         |
//! |---|-----------------|-----------------|
//! | 1 | `SxE`           | `S06xE02`       |
//! | 2 | `SxxEyy`        | `S01E02`        |
//! | 3 | `NxM`           | `1x01`          |
//! | 4 | verbose         | `Season 1 Episode 2` |
//! | 5 | bracketed       | `[3x06]`        |
//! | 6 | parenthesized   | `(s8 e1)`       |
//! | 7 | spaced          | `s2 e1`, `S02.E05` |
//! | 8 | dotted          | `1.01`          |
//! | 9 | episode word    | `Episode 7`     |
//! | 10| ep              | `Ep 7`          |
//! | 11| bare E          | `E07`           |
//!
//! Episode-only rules assume season 1 unless a season keyword such as
//! `season 2` or `serie 2`, or a standalone `S02` token, appears elsewhere
//! in the name. When no rule matches, a season keyword plus any other
//! number is the last resort.

use crate::models::series::EpisodeCoordinate;
use crate::utils::fs::strip_video_extension;
use regex::Regex;
use std::sync::LazyLock;

/// How a rule's capture groups map onto a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Group 1 is the season, group 2 the episode.
    SeasonEpisode,
    /// Like `SeasonEpisode`, but a leading `0` means episode-only.
    DottedPair,
    /// Group 1 is the episode; the season is inferred.
    EpisodeOnly,
}

/// One entry of the rule table.
#[derive(Debug)]
pub struct EpisodeRule {
    pub name: &'static str,
    pub kind: RuleKind,
    pub pattern: Regex,
}

const RULE_SPECS: &[(&str, RuleKind, &str)] = &[
    ("sxe", RuleKind::SeasonEpisode, r"(?i)s(\d+)xe(\d+)"),
    ("sxxeyy", RuleKind::SeasonEpisode, r"(?i)s(\d+)e(\d+)"),
    ("nxm", RuleKind::SeasonEpisode, r"(?i)(?:^|\D)(\d{1,2})x(\d{1,3})(?:\D|$)"),
    (
        "verbose",
        RuleKind::SeasonEpisode,
        r"(?i)season[\s._-]*(\d+)[\s._-]*episode[\s._-]*(\d+)",
    ),
    ("bracketed", RuleKind::SeasonEpisode, r"(?i)\[(\d+)x(\d+)\]"),
    ("parenthesized", RuleKind::SeasonEpisode, r"(?i)\(s\s*(\d+)\s*e\s*(\d+)\)"),
    ("spaced", RuleKind::SeasonEpisode, r"(?i)s(\d+)[\s._-]*e(\d+)"),
    ("dotted", RuleKind::DottedPair, r"(?:^|\D)(\d{1,2})\.(\d{2})(?:\D|$)"),
    ("episode_word", RuleKind::EpisodeOnly, r"(?i)episode[\s._-]*(\d+)"),
    ("ep", RuleKind::EpisodeOnly, r"(?i)ep[\s._-]*(\d+)"),
    ("bare_e", RuleKind::EpisodeOnly, r"(?i)e(\d+)"),
];

static EPISODE_RULES: LazyLock<Vec<EpisodeRule>> = LazyLock::new(|| {
    RULE_SPECS
        .iter()
        .map(|(name, kind, pattern)| EpisodeRule {
            name,
            kind: *kind,
            pattern: Regex::new(pattern).unwrap(),
        })
        .collect()
});

static SEASON_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:season|series|serie)[\s._-]*(\d+)").unwrap());

/// Standalone `s02` token, as in `Show.S02.Ep.05`.
static SEASON_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[^a-z0-9])s(\d{1,2})(?:[^a-z0-9]|$)").unwrap());

static ANY_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// The rule table, in evaluation order.
pub fn rules() -> &'static [EpisodeRule] {
    &EPISODE_RULES
}

/// Whether any episode rule matches anywhere in the filename.
pub fn matches_any_rule(filename: &str) -> bool {
    rules().iter().any(|r| r.pattern.is_match(filename))
}

/// Result of classifying one filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub coordinate: EpisodeCoordinate,
    /// Name of the rule that decided, `"season_keyword"` for the fallback.
    pub rule: Option<&'static str>,
}

/// Classify a filename into a season/episode coordinate.
pub fn classify(filename: &str, series_hint: &str) -> EpisodeCoordinate {
    classify_detailed(filename, series_hint).coordinate
}

/// Classify and report which rule decided.
pub fn classify_detailed(filename: &str, series_hint: &str) -> Classification {
    let cleaned = clean_filename(filename, series_hint);

    for rule in rules() {
        if let Some(caps) = rule.pattern.captures(&cleaned) {
            let coordinate = match rule.kind {
                RuleKind::SeasonEpisode => match (group(&caps, 1), group(&caps, 2)) {
                    (Some(s), Some(e)) => EpisodeCoordinate::new(s, e),
                    _ => EpisodeCoordinate::Unresolved,
                },
                RuleKind::DottedPair => match (group(&caps, 1), group(&caps, 2)) {
                    (Some(0), Some(e)) => episode_only(&cleaned, e),
                    (Some(s), Some(e)) => EpisodeCoordinate::new(s, e),
                    _ => EpisodeCoordinate::Unresolved,
                },
                RuleKind::EpisodeOnly => match group(&caps, 1) {
                    Some(e) => episode_only(&cleaned, e),
                    None => EpisodeCoordinate::Unresolved,
                },
            };
            return Classification {
                coordinate,
                rule: Some(rule.name),
            };
        }
    }

    match season_keyword_fallback(&cleaned) {
        Some(coordinate) => Classification {
            coordinate,
            rule: Some("season_keyword"),
        },
        None => Classification {
            coordinate: EpisodeCoordinate::Unresolved,
            rule: None,
        },
    }
}

/// Lowercase, drop the video extension and every occurrence of the series name.
fn clean_filename(filename: &str, series_hint: &str) -> String {
    let lowered = strip_video_extension(filename).to_lowercase();
    let hint = series_hint.trim().to_lowercase();
    let cleaned = if hint.is_empty() {
        lowered
    } else {
        lowered.replace(&hint, "")
    };
    cleaned.trim().to_string()
}

fn group(caps: &regex::Captures<'_>, idx: usize) -> Option<u32> {
    caps.get(idx).and_then(|m| m.as_str().parse().ok())
}

/// Season 1 unless a season keyword or `sNN` token names another season.
fn episode_only(cleaned: &str, episode: u32) -> EpisodeCoordinate {
    let season = SEASON_KEYWORD
        .captures(cleaned)
        .or_else(|| SEASON_TOKEN.captures(cleaned))
        .and_then(|caps| group(&caps, 1))
        .unwrap_or(1);
    EpisodeCoordinate::new(season, episode)
}

fn season_keyword_fallback(cleaned: &str) -> Option<EpisodeCoordinate> {
    if !cleaned.contains("season") && !cleaned.contains("serie") {
        return None;
    }
    let caps = SEASON_KEYWORD.captures(cleaned)?;
    let whole = caps.get(0)?;
    let season = group(&caps, 1)?;

    let remainder = format!("{}{}", &cleaned[..whole.start()], &cleaned[whole.end()..]);
    let episode = ANY_NUMBER.find(&remainder)?.as_str().parse().ok()?;

    Some(EpisodeCoordinate::new(season, episode))
}
