//! KUVO tab-separated text export merger
//!
//! Rekordbox's "KUVO" text export carries the columns the `.m3u8` lacks.
//! The rows carry no track identity, so they are matched to parsed
//! records purely by position. `merge_metadata` is the only place that
//! knows this.

use super::text::read_text;
use crate::error::{ConvertError, Result};
use crate::model::{TrackMetadata, TrackRecord};
use std::path::Path;

/// Column indices in a KUVO text export
pub mod columns {
    pub const TRACK_NUMBER: usize = 0;
    pub const ALBUM: usize = 4;
    pub const GENRE: usize = 5;
    pub const BPM: usize = 6;
    pub const KEY: usize = 9;
    pub const DATE_ADDED: usize = 10;

    /// Rows with fewer fields than this are malformed
    pub const MIN_FIELDS: usize = DATE_ADDED + 1;
}

/// Merge the KUVO text export at `path` into `tracks`
///
/// Returns new records; the inputs are left untouched.
pub fn merge_metadata(path: &Path, tracks: &[TrackRecord]) -> Result<Vec<TrackRecord>> {
    let content = read_text(path)?;
    merge_metadata_str(&content, path, tracks)
}

/// Merge KUVO content already in memory
pub fn merge_metadata_str(
    content: &str,
    source: &Path,
    tracks: &[TrackRecord],
) -> Result<Vec<TrackRecord>> {
    // Header row first
    let mut rows = content
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty());

    let mut merged = Vec::with_capacity(tracks.len());

    for track in tracks {
        let (idx, row) = rows.next().ok_or_else(|| ConvertError::MetadataExhausted {
            path: source.to_path_buf(),
            expected: tracks.len(),
            filled: merged.len(),
        })?;

        let metadata = parse_row(row).ok_or_else(|| ConvertError::MalformedRow {
            path: source.to_path_buf(),
            line: idx + 1,
            expected: columns::MIN_FIELDS,
            found: row.split('\t').count(),
        })?;

        merged.push(track.with_metadata(metadata));
    }

    log::debug!("Merged metadata for {} tracks from {:?}", merged.len(), source);

    Ok(merged)
}

fn parse_row(row: &str) -> Option<TrackMetadata> {
    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() < columns::MIN_FIELDS {
        return None;
    }

    Some(TrackMetadata {
        track_number: fields[columns::TRACK_NUMBER].to_string(),
        album: fields[columns::ALBUM].to_string(),
        genre: fields[columns::GENRE].to_string(),
        bpm: fields[columns::BPM].to_string(),
        key: fields[columns::KEY].to_string(),
        date_added: fields[columns::DATE_ADDED].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "#\tTrack Title\tArtist\tRemixer\tAlbum\tGenre\tBPM\tRating\tTime\tKey\tDate Added";

    fn track(title: &str) -> TrackRecord {
        TrackRecord::new("200", "Artist", title, "file:///nowhere/a.mp3")
    }

    fn merge(content: &str, tracks: &[TrackRecord]) -> Result<Vec<TrackRecord>> {
        merge_metadata_str(content, Path::new("test.txt"), tracks)
    }

    #[test]
    fn test_merge_single_row() {
        let content = format!("{}\n5\tT\tA\t\tAlbumX\tHouse\t128\t\t\tAmin\t2023-04-01\n", HEADER);
        let merged = merge(&content, &[track("T")]).unwrap();

        let meta = &merged[0].metadata;
        assert_eq!(meta.track_number, "5");
        assert_eq!(meta.album, "AlbumX");
        assert_eq!(meta.genre, "House");
        assert_eq!(meta.bpm, "128");
        assert_eq!(meta.key, "Amin");
        assert_eq!(meta.date_added, "2023-04-01");
    }

    #[test]
    fn test_trailing_empty_fields_count() {
        let content = format!("{}\n5\t\t\t\tAlbumX\tHouse\t128\t\t\tAmin\t\n", HEADER);
        let merged = merge(&content, &[track("T")]).unwrap();

        assert_eq!(merged[0].metadata.key, "Amin");
        assert_eq!(merged[0].metadata.date_added, "");
    }

    #[test]
    fn test_merge_is_positional() {
        let content = format!(
            "{}\n1\t\t\t\tA\tG1\t120\t\t\t1A\t2020-01-01\n2\t\t\t\tB\tG2\t122\t\t\t2A\t2021-01-01\n",
            HEADER
        );
        let merged = merge(&content, &[track("first"), track("second")]).unwrap();

        assert_eq!(merged[0].title, "first");
        assert_eq!(merged[0].metadata.genre, "G1");
        assert_eq!(merged[1].title, "second");
        assert_eq!(merged[1].metadata.genre, "G2");
    }

    #[test]
    fn test_blank_lines_do_not_consume_records() {
        let content = format!(
            "{}\n\n   \n1\t\t\t\tA\tG1\t120\t\t\t1A\t2020-01-01\n\n2\t\t\t\tB\tG2\t122\t\t\t2A\t2021-01-01",
            HEADER
        );
        let merged = merge(&content, &[track("a"), track("b")]).unwrap();
        assert_eq!(merged[1].metadata.track_number, "2");
    }

    #[test]
    fn test_extra_rows_ignored() {
        let content = format!(
            "{}\n1\t\t\t\tA\tG1\t120\t\t\t1A\t2020-01-01\nbroken row\n",
            HEADER
        );
        let merged = merge(&content, &[track("a")]).unwrap();
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_short_row_is_malformed() {
        let content = format!("{}\n1\t\t\t\tA\tG1\t120\n", HEADER);
        let err = merge(&content, &[track("a")]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MalformedRow { line: 2, expected: 11, found: 7, .. }
        ));
    }

    #[test]
    fn test_exhausted_metadata() {
        let content = format!("{}\n1\t\t\t\tA\tG1\t120\t\t\t1A\t2020-01-01\n", HEADER);
        let err = merge(&content, &[track("a"), track("b")]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MetadataExhausted { expected: 2, filled: 1, .. }
        ));
    }

    #[test]
    fn test_header_only_with_no_tracks() {
        assert!(merge(HEADER, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_input_records_untouched() {
        let tracks = vec![track("a")];
        let content = format!("{}\n1\t\t\t\tA\tG1\t120\t\t\t1A\t2020-01-01\n", HEADER);
        let _ = merge(&content, &tracks).unwrap();
        assert_eq!(tracks[0].metadata, TrackMetadata::default());
    }
}
