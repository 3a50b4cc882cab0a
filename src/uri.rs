//! file:// URI handling for track locations
//!
//! Rekordbox writes plain filesystem paths into its `.m3u8` exports. The
//! XML consumer wants them as file URIs:
//! - macOS/Linux: /Users/DJ/Music/Track.mp3 → file:///Users/DJ/Music/Track.mp3
//! - Windows: C:\Music\Track.mp3 → file:///C:/Music/Track.mp3

use crate::error::{ConvertError, Result};
use std::path::{Path, PathBuf};

/// Normalize a location line from an `.m3u8` file into a file URI
///
/// Lines that already are `file:` URIs are kept verbatim. Relative paths
/// are resolved against `base_dir`, the directory holding the playlist.
pub fn line_to_location(line: &str, base_dir: &Path) -> String {
    if line.starts_with("file:") {
        return line.to_string();
    }

    let normalized = line.replace('\\', "/");
    if normalized.starts_with('/') || is_windows_path(&normalized) {
        path_str_to_location(&normalized)
    } else {
        let joined = base_dir.join(line);
        path_to_location(&std::path::absolute(&joined).unwrap_or(joined))
    }
}

/// Convert a filesystem path into a file URI
pub fn path_to_location(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    path_str_to_location(&normalized)
}

fn path_str_to_location(normalized: &str) -> String {
    // Handle Windows drive letters and relative paths: C:/... → /C:/...
    let rooted = if normalized.starts_with('/') {
        normalized.to_string()
    } else {
        format!("/{}", normalized)
    };

    // Encode each path segment separately (preserve slashes)
    let encoded = rooted
        .split('/')
        .enumerate()
        .map(|(idx, segment)| {
            if idx == 1 && segment.len() == 2 && is_windows_path(segment) {
                segment.to_string()
            } else {
                urlencoding::encode(segment).into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    format!("file://{}", encoded)
}

/// Path component of a location, still percent-encoded
///
/// Strips the `file:` scheme and an optional `//` or `//host` authority,
/// leaving the absolute path with its leading slash.
pub fn location_path(location: &str) -> &str {
    let rest = location.strip_prefix("file:").unwrap_or(location);
    match rest.strip_prefix("//") {
        Some(authority_and_path) => match authority_and_path.find('/') {
            Some(idx) => &authority_and_path[idx..],
            None => "",
        },
        None => rest,
    }
}

/// Last path segment of a location, still percent-encoded
pub fn file_name(location: &str) -> &str {
    match location.rfind('/') {
        Some(idx) => &location[idx + 1..],
        None => location,
    }
}

/// Convert a file URI back into a filesystem path
pub fn location_to_path(location: &str) -> Result<PathBuf> {
    let decoded = decode(location_path(location))?;

    // /C:/Music/Track.mp3 → C:/Music/Track.mp3
    let path = match decoded.strip_prefix('/') {
        Some(rest) if is_windows_path(rest) => rest.to_string(),
        _ => decoded,
    };

    Ok(PathBuf::from(path))
}

/// Strict percent-decoding with UTF-8 interpretation
///
/// A `%` that is not followed by two hex digits is an error, so is a
/// decoded byte sequence that is not UTF-8. `+` is left as is rather
/// than form-decoded to a space, so titles like `A + B` keep their plus.
/// This is deliberate and differs from `application/x-www-form-urlencoded`.
pub fn decode(value: &str) -> Result<String> {
    let bytes = value.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            let well_formed = bytes.len() >= idx + 3
                && bytes[idx + 1].is_ascii_hexdigit()
                && bytes[idx + 2].is_ascii_hexdigit();
            if !well_formed {
                return Err(ConvertError::MalformedEscape {
                    value: value.to_string(),
                    offset: idx,
                });
            }
            idx += 3;
        } else {
            idx += 1;
        }
    }

    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ConvertError::InvalidUtf8 {
            value: value.to_string(),
        })
}

/// Check if a path string looks like a Windows path (has drive letter)
fn is_windows_path(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}
