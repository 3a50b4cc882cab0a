//! Text file loading for Rekordbox exports
//!
//! Rekordbox writes its playlist exports as UTF-8 or, depending on the
//! version, UTF-16 with a byte-order mark. Both are accepted here.

use crate::error::{ConvertError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Read a whole text file, honoring a leading byte-order mark
pub fn read_text(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| ConvertError::open(path, e))?;

    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| ConvertError::open(path, e))?;

    decode_text(&bytes).ok_or_else(|| ConvertError::InvalidEncoding {
        path: path.to_path_buf(),
    })
}

fn decode_text(bytes: &[u8]) -> Option<String> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return String::from_utf8(rest.to_vec()).ok();
    }
    if let Some(rest) = bytes.strip_prefix(UTF16LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    String::from_utf8(bytes.to_vec()).ok()
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}
