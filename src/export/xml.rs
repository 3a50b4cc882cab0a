//! Rekordbox 5 XML writer
//!
//! Produces the `DJ_PLAYLISTS` document: one `COLLECTION` holding every
//! track and one playlist node referencing them by track number. All data
//! is carried in attributes.

use super::atomic::write_atomic;
use crate::error::{ConvertError, Result};
use crate::model::TrackRecord;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::path::Path;

pub const XML_VERSION: &str = "1.0";
pub const XML_ENCODING: &str = "UTF-8";
pub const PLAYLISTS_VERSION: &str = "1.0.0";
pub const PRODUCT_NAME: &str = "PlaylistGenerator";
pub const PRODUCT_VERSION: &str = "1.0";
pub const PRODUCT_COMPANY: &str = "PlaylistGenerator";

/// Indentation width of the written document
pub const INDENT: usize = 4;

/// Fixed values for attributes that are never sourced from input
pub mod defaults {
    pub const DISC_NUMBER: &str = "0";
    pub const TRACK_NUMBER: &str = "0";
    pub const BIT_RATE: &str = "320";
    pub const PLAY_COUNT: &str = "0";
    pub const RATING: &str = "0";
}

/// Playlist node types
pub mod node_types {
    pub const ROOT: &str = "0";
    pub const PLAYLIST: &str = "1";
}

/// Render `tracks` as a Rekordbox XML document
///
/// The records must have been merged with their KUVO metadata: the track
/// number is the track's key and the date added supplies the year.
pub fn render_xml(tracks: &[TrackRecord], playlist_name: &str) -> Result<Vec<u8>> {
    if tracks.is_empty() {
        return Err(ConvertError::EmptyPlaylist {
            playlist: playlist_name.to_string(),
        });
    }

    let mut xml = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    let err = |e: std::io::Error| ConvertError::Encode {
        playlist: playlist_name.to_string(),
        reason: format!("XML write error: {}", e),
    };

    xml.write_event(Event::Decl(BytesDecl::new(
        XML_VERSION,
        Some(XML_ENCODING),
        Some("no"),
    )))
    .map_err(err)?;

    let mut root = BytesStart::new("DJ_PLAYLISTS");
    root.push_attribute(("Version", PLAYLISTS_VERSION));
    xml.write_event(Event::Start(root)).map_err(err)?;

    let mut product = BytesStart::new("PRODUCT");
    product.push_attribute(("Name", PRODUCT_NAME));
    product.push_attribute(("Version", PRODUCT_VERSION));
    product.push_attribute(("Company", PRODUCT_COMPANY));
    xml.write_event(Event::Empty(product)).map_err(err)?;

    let entries = tracks.len().to_string();

    let mut collection = BytesStart::new("COLLECTION");
    collection.push_attribute(("Entries", entries.as_str()));
    xml.write_event(Event::Start(collection)).map_err(err)?;

    for track in tracks {
        let elem = track_element(track)?;
        xml.write_event(Event::Empty(elem)).map_err(err)?;
    }

    xml.write_event(Event::End(BytesEnd::new("COLLECTION")))
        .map_err(err)?;

    xml.write_event(Event::Start(BytesStart::new("PLAYLISTS")))
        .map_err(err)?;

    let mut root_node = BytesStart::new("NODE");
    root_node.push_attribute(("Type", node_types::ROOT));
    root_node.push_attribute(("Name", "ROOT"));
    root_node.push_attribute(("Count", "1"));
    xml.write_event(Event::Start(root_node)).map_err(err)?;

    let mut playlist_node = BytesStart::new("NODE");
    playlist_node.push_attribute(("Name", playlist_name));
    playlist_node.push_attribute(("Type", node_types::PLAYLIST));
    playlist_node.push_attribute(("KeyType", "0"));
    playlist_node.push_attribute(("Entries", entries.as_str()));
    xml.write_event(Event::Start(playlist_node)).map_err(err)?;

    for track in tracks {
        let mut track_ref = BytesStart::new("TRACK");
        track_ref.push_attribute(("Key", track.metadata.track_number.as_str()));
        xml.write_event(Event::Empty(track_ref)).map_err(err)?;
    }

    xml.write_event(Event::End(BytesEnd::new("NODE"))).map_err(err)?;
    xml.write_event(Event::End(BytesEnd::new("NODE"))).map_err(err)?;
    xml.write_event(Event::End(BytesEnd::new("PLAYLISTS")))
        .map_err(err)?;
    xml.write_event(Event::End(BytesEnd::new("DJ_PLAYLISTS")))
        .map_err(err)?;

    Ok(xml.into_inner())
}

/// Render and write a Rekordbox XML playlist file
pub fn write_xml(tracks: &[TrackRecord], playlist_name: &str, output_path: &Path) -> Result<()> {
    let bytes = render_xml(tracks, playlist_name)?;
    write_atomic(output_path, &bytes)?;

    log::info!("Wrote {} tracks to {}", tracks.len(), output_path.display());

    Ok(())
}

/// Build a collection TRACK element
fn track_element(track: &TrackRecord) -> Result<BytesStart<'static>> {
    let meta = &track.metadata;
    let size = track.file_size_bytes.to_string();

    let mut elem = BytesStart::new("TRACK");
    elem.push_attribute(("TrackID", meta.track_number.as_str()));
    elem.push_attribute(("Name", track.title.as_str()));
    elem.push_attribute(("Artist", track.artist.as_str()));
    elem.push_attribute(("Composer", ""));
    elem.push_attribute(("Album", ""));
    elem.push_attribute(("GROUPING", ""));
    elem.push_attribute(("GENRE", meta.genre.as_str()));

    // Unknown containers get no Kind at all
    if let Some(kind) = track.kind() {
        elem.push_attribute(("Kind", kind.as_str()));
    }

    elem.push_attribute(("Size", size.as_str()));
    elem.push_attribute(("TotalTime", track.duration_seconds.as_str()));
    elem.push_attribute(("DiscNumber", defaults::DISC_NUMBER));
    elem.push_attribute(("TrackNumber", defaults::TRACK_NUMBER));
    elem.push_attribute(("Year", track.year()?));
    elem.push_attribute(("AverageBPM", meta.bpm.as_str()));
    elem.push_attribute(("DateAdded", meta.date_added.as_str()));
    elem.push_attribute(("BitRate", defaults::BIT_RATE));
    elem.push_attribute(("Comments", ""));
    elem.push_attribute(("PlayCount", defaults::PLAY_COUNT));
    elem.push_attribute(("Rating", defaults::RATING));
    elem.push_attribute(("Location", track.file_location.as_str()));
    elem.push_attribute(("Remixer", ""));
    elem.push_attribute(("Tonality", meta.key.as_str()));
    elem.push_attribute(("Label", ""));
    elem.push_attribute(("Mix", ""));

    Ok(elem)
}
