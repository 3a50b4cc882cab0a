//! Tribe XR JSON playlist export

use super::atomic::write_atomic;
use crate::error::{ConvertError, Result};
use crate::model::TrackRecord;
use crate::uri;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level JSON playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonPlaylist {
    /// Playlist name, followed by a single space
    pub name: String,
    pub tracks: Vec<JsonTrack>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTrack {
    pub track_name: String,
    /// Decoded last segment of the location
    pub filename: String,
    /// Decoded absolute path of the location
    pub full_path: String,
}

impl JsonTrack {
    pub fn from_record(track: &TrackRecord) -> Result<Self> {
        Ok(Self {
            track_name: uri::decode(&track.title)?,
            filename: uri::decode(uri::file_name(&track.file_location))?,
            full_path: uri::decode(uri::location_path(&track.file_location))?,
        })
    }
}

/// Build the JSON playlist for `tracks`
///
/// An empty track list is rejected rather than written as an empty array.
pub fn build_playlist(tracks: &[TrackRecord], playlist_name: &str) -> Result<JsonPlaylist> {
    if tracks.is_empty() {
        return Err(ConvertError::EmptyPlaylist {
            playlist: playlist_name.to_string(),
        });
    }

    Ok(JsonPlaylist {
        name: format!("{} ", playlist_name),
        tracks: tracks
            .iter()
            .map(JsonTrack::from_record)
            .collect::<Result<Vec<_>>>()?,
    })
}

pub fn render_json(tracks: &[TrackRecord], playlist_name: &str) -> Result<Vec<u8>> {
    let playlist = build_playlist(tracks, playlist_name)?;

    serde_json::to_vec_pretty(&playlist).map_err(|e| ConvertError::Encode {
        playlist: playlist_name.to_string(),
        reason: e.to_string(),
    })
}

/// Render and write a Tribe XR JSON playlist file
pub fn write_json(tracks: &[TrackRecord], playlist_name: &str, output_path: &Path) -> Result<()> {
    let bytes = render_json(tracks, playlist_name)?;
    write_atomic(output_path, &bytes)?;

    log::info!("Wrote {} tracks to {}", tracks.len(), output_path.display());

    Ok(())
}
