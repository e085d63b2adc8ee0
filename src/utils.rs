/*!
 * Utility functions for statjson
 */

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Prefix marking a name that is given as base64 of its raw bytes
pub const BASE64_PREFIX: &str = "base64:";

/// Render raw name bytes as text that survives JSON.
///
/// Bytes that are not UTF-8 become `base64:<encoded bytes>`. Names that
/// happen to start with `base64:` are encoded the same way, so every
/// `base64:` value in the output decodes to the original bytes.
pub fn decode_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.starts_with(BASE64_PREFIX) => text.to_string(),
        _ => format!("{}{}", BASE64_PREFIX, STANDARD.encode(bytes)),
    }
}

/// [`decode_bytes`] for OS strings such as paths and account names
pub fn decode_os(name: &OsStr) -> String {
    decode_bytes(name.as_bytes())
}
