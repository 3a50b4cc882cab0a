//! Validation utilities
//!
//! Reads written playlists back and checks their structure

mod roundtrip;

pub use roundtrip::{parse_xml_summary, validate_export, validate_json, validate_xml, XmlSummary};
