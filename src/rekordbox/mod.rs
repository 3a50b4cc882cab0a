//! Rekordbox playlist export parsing
//!
//! Reads the `.m3u8` playlist and the KUVO `.txt` metadata export that
//! Rekordbox writes side by side for each exported playlist.

mod kuvo;
mod m3u8;
mod text;

pub use kuvo::{columns, merge_metadata, merge_metadata_str};
pub use m3u8::{parse_m3u8, parse_m3u8_str, ARTIST_TITLE_SEPARATOR, EXTINF};
pub use text::read_text;

use crate::error::Result;
use crate::model::TrackRecord;
use std::path::Path;

/// Load a playlist, optionally merging its KUVO metadata
///
/// # Arguments
/// * `m3u8_path` - Path to the `.m3u8` playlist
/// * `metadata_path` - Path to the KUVO `.txt` export, `None` to skip the merge
pub fn load_playlist(m3u8_path: &Path, metadata_path: Option<&Path>) -> Result<Vec<TrackRecord>> {
    log::debug!("Parsing playlist from {:?}", m3u8_path);
    let tracks = parse_m3u8(m3u8_path)?;

    let tracks = match metadata_path {
        // Nothing to fill in, and nothing to require from the text file
        Some(_) if tracks.is_empty() => tracks,
        Some(path) => {
            log::debug!("Merging metadata from {:?}", path);
            merge_metadata(path, &tracks)?
        }
        None => tracks,
    };

    log::debug!("Loaded {} tracks from {:?}", tracks.len(), m3u8_path);

    Ok(tracks)
}
