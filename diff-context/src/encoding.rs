//! Legacy-encoding re-check for hunk validation.
//!
//! Some providers compute patches against a copy of the file stored in a
//! different encoding. A line is re-encoded under each legacy encoding and the
//! resulting bytes are read back as UTF-8; if that reproduces the patch line,
//! the encoding is named in the log. The hunk is still treated as invalid.

/// Encodings tried, in order.
pub const LEGACY_ENCODINGS: [&str; 4] = ["iso-8859-1", "latin-1", "ascii", "utf-16"];

/// Returns the first encoding under which `original_line` round-trips into
/// `patch_line` (both compared trimmed).
pub fn detect_alternate_encoding(original_line: &str, patch_line: &str) -> Option<&'static str> {
    let target = patch_line.trim();
    LEGACY_ENCODINGS.into_iter().find(|&name| {
        encode(original_line.trim(), name)
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .is_some_and(|decoded| decoded.trim() == target)
    })
}

/// Encodes `s` under the named encoding; `None` when a char is unrepresentable.
fn encode(s: &str, name: &str) -> Option<Vec<u8>> {
    match name {
        "iso-8859-1" | "latin-1" => s
            .chars()
            .map(|c| u8::try_from(u32::from(c)).ok())
            .collect(),
        "ascii" => s
            .chars()
            .map(|c| if c.is_ascii() { Some(c as u8) } else { None })
            .collect(),
        "utf-16" => {
            // BOM + little-endian code units.
            let mut out = vec![0xFF, 0xFE];
            for unit in s.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
            Some(out)
        }
        _ => None,
    }
}
