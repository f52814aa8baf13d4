//! Byte stuffing for the GDL90 framed region.
//!
//! Inside a frame, 0x7E and 0x7D never appear literally: the producer
//! replaces them with an escape marker followed by the value XORed with
//! 0x20. [`unstuff`] reverses that on the decode path; [`stuff`] is the
//! encode direction.

use crate::types::{Gdl90Error, Result, ESCAPE_BYTE, ESCAPE_XOR, FLAG_BYTE};

/// Remove escape sequences from an escaped payload (flag bytes already
/// stripped), restoring the logical message bytes.
///
/// A marker as the last byte has no data byte to combine with; such a
/// payload is rejected rather than decoded on a guess.
pub fn unstuff(payload: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(payload.len());
    let mut i = 0;
    while i < payload.len() {
        let byte = payload[i];
        if byte == ESCAPE_BYTE {
            match payload.get(i + 1) {
                Some(&next) => {
                    out.push(next ^ ESCAPE_XOR);
                    i += 2;
                }
                None => return Err(Gdl90Error::TrailingEscape),
            }
        } else {
            out.push(byte);
            i += 1;
        }
    }
    Ok(out)
}

/// Escape every flag and marker byte so the result can travel inside a
/// frame.
pub fn stuff(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &byte in bytes {
        if byte == FLAG_BYTE || byte == ESCAPE_BYTE {
            out.push(ESCAPE_BYTE);
            out.push(byte ^ ESCAPE_XOR);
        } else {
            out.push(byte);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
