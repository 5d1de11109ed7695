//! File system and filename utilities.

use crate::Result;
use std::path::Path;

/// Video containers in display preference order.
pub const PREFERRED_CONTAINERS: &[&str] = &["mkv", "mp4", "avi", "mov"];

/// Extensions recognised as video containers.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "wmv", "m4v", "ts", "m2ts", "flv", "webm", "mpg", "mpeg",
];

/// Create a directory and all parent directories.
pub fn create_dir_all(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write a file through a temporary sibling so readers never see a partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Get file extension in lowercase.
pub fn get_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Check if a filename carries a video container extension.
pub fn is_video_file(filename: &str) -> bool {
    get_extension(filename)
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Strip a trailing video extension, leaving other suffixes alone.
pub fn strip_video_extension(filename: &str) -> &str {
    if is_video_file(filename) {
        if let Some(idx) = filename.rfind('.') {
            return &filename[..idx];
        }
    }
    filename
}

/// Position of the container in [`PREFERRED_CONTAINERS`]; unknown ones rank last.
pub fn container_rank(filename: &str) -> usize {
    get_extension(filename)
        .and_then(|ext| PREFERRED_CONTAINERS.iter().position(|c| *c == ext))
        .unwrap_or(PREFERRED_CONTAINERS.len())
}
