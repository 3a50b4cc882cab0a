//! Conversion orchestration and output writers

pub mod atomic;
pub mod config;
pub mod discovery;
pub mod json;
pub mod pipeline;
pub mod xml;

pub use config::ConvertConfig;
pub use discovery::{Candidate, PlaylistPaths};
pub use json::{write_json, JsonPlaylist, JsonTrack};
pub use pipeline::{BatchReport, ConvertPipeline, OutcomeStatus, OutputFormat};
pub use xml::write_xml;
