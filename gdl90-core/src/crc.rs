//! CRC-CCITT frame check sequence for GDL90 messages.
//!
//! The interface FCS is a table-driven CRC-CCITT: 256 entries computed
//! once and left unchanged afterward. The CRC domain is the type byte
//! through the last payload byte; the two FCS bytes and the frame flags
//! are excluded.

/// CRC-CCITT generator polynomial.
const GENERATOR: u16 = 0x1021;

// ---------------------------------------------------------------------------
// CRC lookup table (compile-time)
// ---------------------------------------------------------------------------

const fn build_crc_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            let msb_set = crc & 0x8000 != 0;
            crc <<= 1;
            if msb_set {
                crc ^= GENERATOR;
            }
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static CRC_TABLE: [u16; 256] = build_crc_table();

// ---------------------------------------------------------------------------
// Core CRC functions
// ---------------------------------------------------------------------------

/// Compute the FCS over `[type byte .. last payload byte]`, seed 0.
pub fn compute_crc(bytes: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in bytes {
        crc = CRC_TABLE[(crc >> 8) as usize] ^ (crc << 8) ^ u16::from(byte);
    }
    crc
}

/// Append the FCS to a message, low byte first.
///
/// Encode-side counterpart of the validation in the decode path; also
/// what the test vectors use to build wire frames.
pub fn append_crc(message: &[u8]) -> Vec<u8> {
    let crc = compute_crc(message);
    let mut out = Vec::with_capacity(message.len() + 2);
    out.extend_from_slice(message);
    out.push((crc & 0xFF) as u8);
    out.push((crc >> 8) as u8);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
