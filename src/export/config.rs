//! Conversion configuration

use std::path::PathBuf;

/// Configuration for one conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Directory holding the Rekordbox `.m3u8` and `.txt` exports
    pub source_dir: PathBuf,

    /// Directory the `.xml` and `.json` files are written to
    pub dest_dir: PathBuf,

    /// Single playlist prefix to convert (None = every playlist found)
    pub playlist: Option<String>,

    /// Produce Tribe XR JSON
    pub json: bool,

    /// Produce Rekordbox 5 XML
    pub xml: bool,
}

impl ConvertConfig {
    /// Create a configuration with JSON output only
    pub fn new(source_dir: PathBuf, dest_dir: PathBuf) -> Self {
        Self {
            source_dir,
            dest_dir,
            playlist: None,
            json: true,
            xml: false,
        }
    }

    /// Restrict the run to one playlist; blank names are ignored
    pub fn with_playlist(mut self, playlist: Option<String>) -> Self {
        self.playlist = playlist.filter(|name| !name.trim().is_empty());
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_xml(mut self, xml: bool) -> Self {
        self.xml = xml;
        self
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("."), PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConvertConfig::default();
        assert!(config.json);
        assert!(!config.xml);
        assert!(config.playlist.is_none());
        assert_eq!(config.source_dir, PathBuf::from("."));
    }

    #[test]
    fn test_blank_playlist_is_no_filter() {
        let config = ConvertConfig::default().with_playlist(Some("   ".to_string()));
        assert!(config.playlist.is_none());

        let config = ConvertConfig::default().with_playlist(Some("Friday".to_string()));
        assert_eq!(config.playlist.as_deref(), Some("Friday"));
    }
}
