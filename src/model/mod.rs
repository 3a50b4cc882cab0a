//! Data model shared by the playlist parser, the metadata merger and
//! both serializers.

mod track;

pub use track::{FileKind, TrackMetadata, TrackRecord};
