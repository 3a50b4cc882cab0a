//! Playlist Converter - Rekordbox playlist export converter
//!
//! This library turns the `.m3u8` and KUVO `.txt` playlist exports of
//! newer Rekordbox versions into Rekordbox 5 XML and Tribe XR JSON.

pub mod error;
pub mod export;
pub mod model;
pub mod rekordbox;
pub mod uri;
pub mod validation;

pub use error::{ConvertError, ErrorCategory, Result};
pub use export::config::ConvertConfig;
pub use export::pipeline::ConvertPipeline;
