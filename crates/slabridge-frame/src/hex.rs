//! Hex text for passthrough packets and diagnostics.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Decode hex text into bytes, pair by pair.
///
/// All whitespace is skipped, so `"40 41 42"` and `"404142"` decode the
/// same. Either case is accepted. Empty input, an odd digit count, or a
/// non-hex character is an error and yields nothing: no partial output.
/// Error offsets are byte positions in `text`.
pub fn decode_hex(text: &str) -> Result<Bytes> {
    let mut out = BytesMut::with_capacity(text.len() / 2);
    let mut pending: Option<(usize, u8)> = None;

    for (offset, c) in text.char_indices().filter(|(_, c)| !c.is_whitespace()) {
        let value = nibble(c).ok_or(FrameError::InvalidHex {
            offset,
            reason: "not a hex digit",
        })?;
        match pending.take() {
            Some((_, hi)) => out.put_u8((hi << 4) | value),
            None => pending = Some((offset, value)),
        }
    }

    if let Some((offset, _)) = pending {
        return Err(FrameError::InvalidHex {
            offset,
            reason: "odd number of hex digits",
        });
    }
    if out.is_empty() {
        return Err(FrameError::InvalidHex {
            offset: 0,
            reason: "no hex digits",
        });
    }
    Ok(out.freeze())
}

/// Upper-case hex with a space between bytes, e.g. `40 53 48`.
pub fn encode_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn nibble(digit: char) -> Option<u8> {
    digit.to_digit(16).map(|value| value as u8)
}
