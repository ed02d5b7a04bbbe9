//! Inbound message normalization.

use bytes::Bytes;

/// Normalize an inbound payload before it is broadcast.
///
/// Every `\n` becomes a single space, then leading and trailing ASCII
/// whitespace is trimmed. Outbound frames use `\n` to separate coalesced
/// messages, so a normalized message never contains one.
pub fn normalize_message(payload: &[u8]) -> Bytes {
    let replaced: Vec<u8> = payload
        .iter()
        .map(|&byte| if byte == b'\n' { b' ' } else { byte })
        .collect();
    Bytes::copy_from_slice(replaced.trim_ascii())
}
