//! File-decoding collaborator: best-effort text acquisition. Detection is
//! BOM-based (UTF-8, UTF-16 LE/BE); anything else is treated as UTF-8 with
//! lossy replacement — bytes are assumed already-normalized when detection
//! is inconclusive.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::error::SiftError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Read a file and decode it to normalized text.
pub fn read_file_text(path: &Path) -> Result<String, SiftError> {
    let bytes = fs::read(path).map_err(|source| SiftError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_bytes(&bytes))
}

/// Decode raw bytes to text. Never fails — undecodable sequences become
/// replacement characters.
#[must_use]
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

fn decode_utf16(bytes: &[u8], read: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|c| read([c[0], c[1]]));
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
