//! Round-trip validation of written playlists

use crate::export::discovery::{JSON_EXTENSION, XML_EXTENSION};
use crate::export::{ConvertConfig, JsonPlaylist};
use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// What a Rekordbox XML playlist contains, as read back from disk
#[derive(Debug, Default)]
pub struct XmlSummary {
    /// `Entries` attribute of COLLECTION
    pub collection_entries: usize,

    /// Attributes of each collection TRACK, in document order
    pub collection: Vec<BTreeMap<String, String>>,

    /// Name of the playlist node
    pub playlist_name: String,

    /// `Entries` attribute of the playlist node
    pub playlist_entries: usize,

    /// `Key` of each playlist TRACK, in document order
    pub playlist_keys: Vec<String>,
}

/// Parse a Rekordbox XML document into an [`XmlSummary`]
pub fn parse_xml_summary(text: &str) -> Result<XmlSummary> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut summary = XmlSummary::default();
    let mut in_collection = false;
    let mut in_playlist = false;

    loop {
        match reader.read_event().context("Malformed XML")? {
            Event::Start(e) => match e.name().as_ref() {
                b"COLLECTION" => {
                    in_collection = true;
                    summary.collection_entries = count_attribute(&e, b"Entries")?;
                }
                b"NODE" if attribute(&e, b"Type")?.as_deref() == Some("1") => {
                    in_playlist = true;
                    summary.playlist_name = attribute(&e, b"Name")?.unwrap_or_default();
                    summary.playlist_entries = count_attribute(&e, b"Entries")?;
                }
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"TRACK" => {
                if in_collection {
                    summary.collection.push(all_attributes(&e)?);
                } else if in_playlist {
                    let key = attribute(&e, b"Key")?.context("Playlist TRACK without Key")?;
                    summary.playlist_keys.push(key);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"COLLECTION" => in_collection = false,
                b"NODE" => in_playlist = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(summary)
}

/// Validate a written Rekordbox XML playlist
///
/// Entry counts must agree with the number of tracks, and every playlist
/// key must reference a collection TrackID in the same order.
pub fn validate_xml(path: &Path) -> Result<XmlSummary> {
    log::debug!("Validating XML playlist {:?}", path);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read XML playlist: {:?}", path))?;
    let summary =
        parse_xml_summary(&text).with_context(|| format!("Failed to parse {:?}", path))?;

    let tracks = summary.collection.len();
    if summary.collection_entries != tracks {
        anyhow::bail!(
            "{:?}: COLLECTION Entries={} but {} TRACK elements",
            path,
            summary.collection_entries,
            tracks
        );
    }
    if summary.playlist_entries != summary.playlist_keys.len() || summary.playlist_entries != tracks
    {
        anyhow::bail!(
            "{:?}: playlist Entries={} with {} keys for {} tracks",
            path,
            summary.playlist_entries,
            summary.playlist_keys.len(),
            tracks
        );
    }

    let ids = summary
        .collection
        .iter()
        .map(|attrs| attrs.get("TrackID").map(String::as_str).unwrap_or_default());
    if !ids.eq(summary.playlist_keys.iter().map(String::as_str)) {
        anyhow::bail!("{:?}: playlist keys do not match collection TrackIDs", path);
    }

    Ok(summary)
}

/// Validate a written Tribe XR JSON playlist
pub fn validate_json(path: &Path) -> Result<JsonPlaylist> {
    log::debug!("Validating JSON playlist {:?}", path);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON playlist: {:?}", path))?;
    let playlist: JsonPlaylist =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {:?}", path))?;

    if playlist.tracks.is_empty() {
        anyhow::bail!("{:?}: playlist has no tracks", path);
    }

    Ok(playlist)
}

/// Validate existing outputs in the destination directory
///
/// Only the formats enabled in `config` are checked, restricted to the
/// configured playlist if there is one. Returns the number of files
/// validated.
pub fn validate_export(config: &ConvertConfig) -> Result<usize> {
    log::info!("Validating playlists in {:?}", config.dest_dir);

    let mut validated = 0;

    let walker = WalkDir::new(&config.dest_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry
            .with_context(|| format!("Failed to list {:?}", config.dest_dir))?;
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        let wanted = |prefix: &str| {
            config
                .playlist
                .as_deref()
                .map_or(true, |playlist| playlist == prefix)
        };

        if let Some(prefix) = name.strip_suffix(XML_EXTENSION) {
            if config.xml && wanted(prefix) {
                let summary = validate_xml(entry.path())?;
                log::info!("✅ {}: {} tracks", name, summary.collection.len());
                validated += 1;
            }
        } else if let Some(prefix) = name.strip_suffix(JSON_EXTENSION) {
            if config.json && wanted(prefix) {
                let playlist = validate_json(entry.path())?;
                log::info!("✅ {}: {} tracks", name, playlist.tracks.len());
                validated += 1;
            }
        }
    }

    Ok(validated)
}

fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn count_attribute(e: &BytesStart, name: &[u8]) -> Result<usize> {
    let value = attribute(e, name)?.unwrap_or_default();
    value
        .parse()
        .with_context(|| format!("Invalid {} count '{}'", String::from_utf8_lossy(name), value))
}

fn all_attributes(e: &BytesStart) -> Result<BTreeMap<String, String>> {
    let mut attrs = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        attrs.insert(
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            attr.unescape_value()?.into_owned(),
        );
    }
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::xml::render_xml;
    use crate::model::{TrackMetadata, TrackRecord};

    fn merged(number: &str, title: &str) -> TrackRecord {
        TrackRecord::new("300", "Artist", title, "file:///m/track.mp3").with_metadata(
            TrackMetadata {
                track_number: number.to_string(),
                date_added: "2021-01-01".to_string(),
                ..TrackMetadata::default()
            },
        )
    }

    #[test]
    fn test_summary_of_rendered_document() {
        let tracks = vec![merged("1", "A"), merged("2", "B"), merged("3", "C")];
        let xml = String::from_utf8(render_xml(&tracks, "Set").unwrap()).unwrap();

        let summary = parse_xml_summary(&xml).unwrap();
        assert_eq!(summary.collection_entries, 3);
        assert_eq!(summary.collection.len(), 3);
        assert_eq!(summary.playlist_name, "Set");
        assert_eq!(summary.playlist_keys, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_escaped_values_recovered() {
        let title = r#"Tom & Jerry <Dub> "VIP" it's"#;
        let xml = String::from_utf8(render_xml(&[merged("1", title)], "R&B").unwrap()).unwrap();

        let summary = parse_xml_summary(&xml).unwrap();
        assert_eq!(summary.collection[0]["Name"], title);
        assert_eq!(summary.playlist_name, "R&B");
    }

    #[test]
    fn test_mismatched_counts_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.xml");
        std::fs::write(
            &path,
            r#"<DJ_PLAYLISTS><COLLECTION Entries="2"><TRACK TrackID="1"/></COLLECTION></DJ_PLAYLISTS>"#,
        )
        .unwrap();

        assert!(validate_xml(&path).is_err());
    }

    #[test]
    fn test_empty_json_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, r#"{"name": "x ", "tracks": []}"#).unwrap();

        assert!(validate_json(&path).is_err());
    }
}
