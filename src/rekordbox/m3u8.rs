//! Rekordbox `.m3u8` playlist parser
//!
//! Only `#EXTINF:` entries are read. Each one looks like
//!
//! ```text
//! #EXTINF:<duration>,<artist> - <title>
//! <file location>
//! ```
//!
//! Every other line (`#EXTM3U`, comments, blanks) is skipped.

use super::text::read_text;
use crate::error::{ConvertError, Result};
use crate::model::TrackRecord;
use crate::uri;
use std::path::Path;

pub const EXTINF: &str = "#EXTINF:";
pub const ARTIST_TITLE_SEPARATOR: &str = " - ";

/// Parse an `.m3u8` file into track records, in file order
pub fn parse_m3u8(path: &Path) -> Result<Vec<TrackRecord>> {
    let content = read_text(path)?;
    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Relative track locations must not end up as rooted URIs
    let base_dir = std::path::absolute(base_dir).map_err(|e| ConvertError::open(path, e))?;
    parse_m3u8_str(&content, path, &base_dir)
}

/// Parse `.m3u8` content already in memory
///
/// `source` is only used in error messages; relative track locations are
/// resolved against `base_dir`.
pub fn parse_m3u8_str(content: &str, source: &Path, base_dir: &Path) -> Result<Vec<TrackRecord>> {
    let mut tracks = Vec::new();
    let mut lines = content.lines().enumerate();

    while let Some((idx, line)) = lines.next() {
        let Some(info) = line.strip_prefix(EXTINF) else {
            continue;
        };
        let line_no = idx + 1;

        let missing = |delimiter| ConvertError::MissingDelimiter {
            path: source.to_path_buf(),
            line: line_no,
            delimiter,
        };

        let (duration, rest) = info.split_once(',').ok_or_else(|| missing(","))?;
        let (artist, title) = rest
            .split_once(ARTIST_TITLE_SEPARATOR)
            .ok_or_else(|| missing(ARTIST_TITLE_SEPARATOR))?;

        // The location line follows unconditionally
        let (_, location_line) = lines.next().ok_or_else(|| ConvertError::MissingLocation {
            path: source.to_path_buf(),
            line: line_no,
        })?;
        let location = uri::line_to_location(location_line, base_dir);

        log::debug!("Parsed entry: {} - {} ({})", artist, title, location);
        tracks.push(TrackRecord::new(duration, artist, title, location));
    }

    Ok(tracks)
}
