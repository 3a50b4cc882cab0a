//! Playlist discovery in the source directory

use super::config::ConvertConfig;
use crate::error::{ConvertError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const M3U8_EXTENSION: &str = ".m3u8";
pub const TXT_EXTENSION: &str = ".txt";
pub const XML_EXTENSION: &str = ".xml";
pub const JSON_EXTENSION: &str = ".json";

/// A playlist to convert, named by its file prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// File name without extension, shared by the `.m3u8` and `.txt`
    pub prefix: String,

    /// Whether XML conversion should be attempted
    pub xml_eligible: bool,
}

/// Paths belonging to one playlist prefix
#[derive(Debug, Clone)]
pub struct PlaylistPaths {
    pub m3u8: PathBuf,
    pub txt: PathBuf,
    pub xml: PathBuf,
    pub json: PathBuf,
}

impl PlaylistPaths {
    pub fn new(source_dir: &Path, dest_dir: &Path, prefix: &str) -> Self {
        Self {
            m3u8: source_dir.join(format!("{}{}", prefix, M3U8_EXTENSION)),
            txt: source_dir.join(format!("{}{}", prefix, TXT_EXTENSION)),
            xml: dest_dir.join(format!("{}{}", prefix, XML_EXTENSION)),
            json: dest_dir.join(format!("{}{}", prefix, JSON_EXTENSION)),
        }
    }
}

/// Work out which playlists a run should convert
///
/// With a playlist filter the single name is returned and XML is always
/// attempted for it. Otherwise every `.m3u8` in the source directory is
/// a candidate, XML-eligible only when a `.txt` with the same prefix
/// sits next to it.
pub fn find_candidates(config: &ConvertConfig) -> Result<Vec<Candidate>> {
    if let Some(ref playlist) = config.playlist {
        return Ok(vec![Candidate {
            prefix: playlist.clone(),
            xml_eligible: true,
        }]);
    }

    let mut m3u8_prefixes = Vec::new();
    let mut txt_prefixes = HashSet::new();

    let walker = WalkDir::new(&config.source_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| ConvertError::SourceDir {
            path: config.source_dir.clone(),
            reason: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            log::debug!("Skipping non UTF-8 file name {:?}", entry.path());
            continue;
        };

        if let Some(prefix) = name.strip_suffix(M3U8_EXTENSION) {
            m3u8_prefixes.push(prefix.to_string());
        } else if let Some(prefix) = name.strip_suffix(TXT_EXTENSION) {
            txt_prefixes.insert(prefix.to_string());
        }
    }

    let candidates = m3u8_prefixes
        .into_iter()
        .map(|prefix| Candidate {
            xml_eligible: txt_prefixes.contains(&prefix),
            prefix,
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Found {} playlist(s) in {:?}",
        candidates.len(),
        config.source_dir
    );

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &Path) -> ConvertConfig {
        ConvertConfig::new(dir.to_path_buf(), dir.to_path_buf())
    }

    #[test]
    fn test_pairs_m3u8_with_txt() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("friday.m3u8"), "").unwrap();
        fs::write(dir.path().join("friday.txt"), "").unwrap();
        fs::write(dir.path().join("saturday.m3u8"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("cover.jpg"), "").unwrap();

        let candidates = find_candidates(&config_for(dir.path())).unwrap();

        assert_eq!(
            candidates,
            vec![
                Candidate { prefix: "friday".to_string(), xml_eligible: true },
                Candidate { prefix: "saturday".to_string(), xml_eligible: false },
            ]
        );
    }

    #[test]
    fn test_subdirectories_not_scanned() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested.m3u8")).unwrap();
        fs::create_dir(dir.path().join("deeper")).unwrap();
        fs::write(dir.path().join("deeper/inner.m3u8"), "").unwrap();

        assert!(find_candidates(&config_for(dir.path())).unwrap().is_empty());
    }

    #[test]
    fn test_filter_skips_scan() {
        let config = ConvertConfig::new(PathBuf::from("/does/not/exist"), PathBuf::from("."))
            .with_playlist(Some("friday".to_string()));

        let candidates = find_candidates(&config).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].xml_eligible);
    }

    #[test]
    fn test_missing_source_dir() {
        let config = config_for(Path::new("/does/not/exist"));
        assert!(matches!(
            find_candidates(&config),
            Err(ConvertError::SourceDir { .. })
        ));
    }

    #[test]
    fn test_playlist_paths() {
        let paths = PlaylistPaths::new(Path::new("/in"), Path::new("/out"), "set 1");
        assert_eq!(paths.m3u8, PathBuf::from("/in/set 1.m3u8"));
        assert_eq!(paths.txt, PathBuf::from("/in/set 1.txt"));
        assert_eq!(paths.xml, PathBuf::from("/out/set 1.xml"));
        assert_eq!(paths.json, PathBuf::from("/out/set 1.json"));
    }
}
