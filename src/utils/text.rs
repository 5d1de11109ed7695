//! Text utilities.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Remove diacritics by canonical decomposition, dropping combining marks.
pub fn remove_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Filesystem- and key-safe identifier for a series name.
///
/// Characters outside word characters, `-`, `_`, `.` and space become `_`,
/// then the result is lowercased with spaces turned into `_`. Distinct names
/// may collide.
pub fn slugify(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    safe.to_lowercase().replace(' ', "_")
}

/// Human readable size (B, KB, MB, GB).
pub fn format_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < 1024.0 {
        return format!("{}B", bytes);
    }
    let kb = size / 1024.0;
    if kb < 1024.0 {
        return format!("{}KB", kb.round() as u64);
    }
    let mb = kb / 1024.0;
    if mb < 1024.0 {
        return format!("{:.2}MB", mb);
    }
    format!("{:.2}GB", mb / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_diacritics() {
        assert_eq!(remove_diacritics("Přátelé"), "Pratele");
        assert_eq!(remove_diacritics("Ženy v běhu"), "Zeny v behu");
        assert_eq!(remove_diacritics("Friends"), "Friends");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("How I Met Your Mother"), "how_i_met_your_mother");
        assert_eq!(slugify("Marvel's Agents: S.H.I.E.L.D."), "marvel_s_agents__s.h.i.e.l.d.");
        assert_eq!(slugify("Přátelé"), "přátelé");
        assert_eq!(slugify("a/b"), "a_b");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(2048), "2KB");
        assert_eq!(format_size(300 * 1024 * 1024), "300.00MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00GB");
    }
}
