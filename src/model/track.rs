use crate::error::{ConvertError, Result};
use crate::uri;

/// One playlist entry as read from a Rekordbox `.m3u8` export
///
/// Records are values: the parser creates them and the metadata merger
/// derives new ones through [`TrackRecord::with_metadata`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// Duration exactly as written after `#EXTINF:`
    pub duration_seconds: String,

    /// Artist name
    pub artist: String,

    /// Track title
    pub title: String,

    /// file:// URI of the audio file
    pub file_location: String,

    /// Size of the audio file, 0 when it could not be found
    pub file_size_bytes: u64,

    /// Fields filled in from the KUVO text export
    pub metadata: TrackMetadata,
}

/// Metadata columns taken from the KUVO tab-separated text export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub track_number: String,
    pub album: String,
    pub genre: String,
    pub bpm: String,
    pub key: String,
    pub date_added: String,
}

/// Audio container, as reported in the XML `Kind` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Mp3,
    Wav,
}

impl FileKind {
    /// Detect the kind from the last four characters of a location
    ///
    /// Only `.mp3` and `.wav` are known; anything else yields `None`.
    pub fn from_location(location: &str) -> Option<Self> {
        let tail: String = {
            let chars: Vec<char> = location.chars().collect();
            chars[chars.len().saturating_sub(4)..].iter().collect()
        };

        if tail.eq_ignore_ascii_case(".mp3") {
            Some(FileKind::Mp3)
        } else if tail.eq_ignore_ascii_case(".wav") {
            Some(FileKind::Wav)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Mp3 => "MP3 File",
            FileKind::Wav => "WAV File",
        }
    }
}

impl TrackRecord {
    /// Create a record and resolve the size of the file it points at
    pub fn new(
        duration_seconds: impl Into<String>,
        artist: impl Into<String>,
        title: impl Into<String>,
        file_location: impl Into<String>,
    ) -> Self {
        let file_location = file_location.into();
        let file_size_bytes = resolve_file_size(&file_location);

        Self {
            duration_seconds: duration_seconds.into(),
            artist: artist.into(),
            title: title.into(),
            file_location,
            file_size_bytes,
            metadata: TrackMetadata::default(),
        }
    }

    /// Copy of this record carrying the given metadata
    pub fn with_metadata(&self, metadata: TrackMetadata) -> Self {
        Self {
            metadata,
            ..self.clone()
        }
    }

    pub fn kind(&self) -> Option<FileKind> {
        FileKind::from_location(&self.file_location)
    }

    /// Year the track was added: the first four characters of `date_added`
    pub fn year(&self) -> Result<&str> {
        let date = self.metadata.date_added.as_str();
        match date.char_indices().nth(4) {
            Some((end, _)) => Ok(&date[..end]),
            None if date.chars().count() == 4 => Ok(date),
            None => Err(ConvertError::DateTooShort {
                title: self.title.clone(),
                date_added: date.to_string(),
            }),
        }
    }
}

fn resolve_file_size(location: &str) -> u64 {
    let path = match uri::location_to_path(location) {
        Ok(path) => path,
        Err(e) => {
            log::debug!("Cannot resolve size of {}: {}", location, e);
            return 0;
        }
    };

    match std::fs::metadata(&path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            log::debug!("Cannot stat {:?}: {}", path, e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_date(date_added: &str) -> TrackRecord {
        TrackRecord::new("200", "Artist", "Title", "file:///nowhere/track.mp3").with_metadata(
            TrackMetadata {
                date_added: date_added.to_string(),
                ..TrackMetadata::default()
            },
        )
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(FileKind::from_location("file:///a/b.mp3"), Some(FileKind::Mp3));
        assert_eq!(FileKind::from_location("file:///a/b.WAV"), Some(FileKind::Wav));
        assert_eq!(FileKind::from_location("file:///a/b.Mp3"), Some(FileKind::Mp3));
    }

    #[test]
    fn test_kind_unknown_extension_is_unset() {
        assert_eq!(FileKind::from_location("file:///a/b.flac"), None);
        assert_eq!(FileKind::from_location("file:///a/b.aiff"), None);
        assert_eq!(FileKind::from_location("mp3"), None);
    }

    #[test]
    fn test_missing_file_has_zero_size() {
        let track = TrackRecord::new("1", "a", "t", "file:///definitely/not/here.mp3");
        assert_eq!(track.file_size_bytes, 0);
    }

    #[test]
    fn test_existing_file_size_is_resolved() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("My Track.mp3");
        std::fs::write(&path, b"0123456789").unwrap();

        let location = uri::path_to_location(&path);
        let track = TrackRecord::new("1", "a", "t", location);
        assert_eq!(track.file_size_bytes, 10);
    }

    #[test]
    fn test_with_metadata_leaves_original_untouched() {
        let original = TrackRecord::new("1", "a", "t", "file:///x.mp3");
        let merged = original.with_metadata(TrackMetadata {
            genre: "House".to_string(),
            ..TrackMetadata::default()
        });

        assert_eq!(original.metadata.genre, "");
        assert_eq!(merged.metadata.genre, "House");
        assert_eq!(merged.title, original.title);
    }

    #[test]
    fn test_year() {
        assert_eq!(record_with_date("2023-04-01").year().unwrap(), "2023");
        assert_eq!(record_with_date("1999").year().unwrap(), "1999");
    }

    #[test]
    fn test_year_too_short() {
        let err = record_with_date("23").year().unwrap_err();
        assert!(matches!(err, ConvertError::DateTooShort { .. }));
        assert!(record_with_date("").year().is_err());
    }
}
