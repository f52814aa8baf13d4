//! Shared types, error enum, wire constants, and the message catalog.

use serde::Serialize;
use thiserror::Error;

/// All errors produced by gdl90-core.
///
/// Protocol conditions that keep a single frame from decoding. Bad CRCs,
/// length mismatches, and stream corruption are not errors; they surface
/// as record flags and counters so the stream keeps flowing.
#[derive(Debug, Error)]
pub enum Gdl90Error {
    #[error("escape marker at end of payload with no following byte")]
    TrailingEscape,
    #[error("message too short: {len} bytes, need a type byte plus 16-bit FCS")]
    TruncatedMessage { len: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Gdl90Error>;

// ---------------------------------------------------------------------------
// Wire constants
// ---------------------------------------------------------------------------

/// Frame delimiter.
pub const FLAG_BYTE: u8 = 0x7E;

/// Byte-stuffing marker; the byte after it carries the original value
/// XORed with [`ESCAPE_XOR`].
pub const ESCAPE_BYTE: u8 = 0x7D;

/// XOR mask applied to the byte following an escape marker.
pub const ESCAPE_XOR: u8 = 0x20;

// ---------------------------------------------------------------------------
// Message catalog
// ---------------------------------------------------------------------------

/// Message type codes known to this decoder.
///
/// Only [`MessageType::Heartbeat`] and [`MessageType::TrafficReport`] get
/// field-level decoding; the rest are named and CRC-checked only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageType {
    Heartbeat,
    UplinkData,
    OwnshipReport,
    OwnshipGeometricAltitude,
    TrafficReport,
    BasicReport,
    LongReport,
    StratuxAhrs,
    StratuxHeartbeatOld,
    ForeflightStatus,
    StratuxHeartbeat,
}

impl MessageType {
    /// Look up a type byte in the catalog. Returns `None` for codes the
    /// catalog does not list.
    pub fn from_byte(code: u8) -> Option<MessageType> {
        match code {
            0x00 => Some(MessageType::Heartbeat),
            0x07 => Some(MessageType::UplinkData),
            0x0A => Some(MessageType::OwnshipReport),
            0x0B => Some(MessageType::OwnshipGeometricAltitude),
            0x14 => Some(MessageType::TrafficReport),
            0x1E => Some(MessageType::BasicReport),
            0x1F => Some(MessageType::LongReport),
            0x4C => Some(MessageType::StratuxAhrs),
            0x53 => Some(MessageType::StratuxHeartbeatOld),
            0x65 => Some(MessageType::ForeflightStatus),
            0xCC => Some(MessageType::StratuxHeartbeat),
            _ => None,
        }
    }

    /// The wire code for this type.
    pub fn code(self) -> u8 {
        match self {
            MessageType::Heartbeat => 0x00,
            MessageType::UplinkData => 0x07,
            MessageType::OwnshipReport => 0x0A,
            MessageType::OwnshipGeometricAltitude => 0x0B,
            MessageType::TrafficReport => 0x14,
            MessageType::BasicReport => 0x1E,
            MessageType::LongReport => 0x1F,
            MessageType::StratuxAhrs => 0x4C,
            MessageType::StratuxHeartbeatOld => 0x53,
            MessageType::ForeflightStatus => 0x65,
            MessageType::StratuxHeartbeat => 0xCC,
        }
    }

    /// Canonical human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            MessageType::Heartbeat => "GDL90 - Heartbeat",
            MessageType::UplinkData => "GDL90 - Uplink Data",
            MessageType::OwnshipReport => "GDL90 - Ownship Report",
            MessageType::OwnshipGeometricAltitude => "GDL90 - Ownship Geometric Altitude",
            MessageType::TrafficReport => "GDL90 - Traffic Report",
            MessageType::BasicReport => "GDL90 - Basic Report",
            MessageType::LongReport => "GDL90 - Long Report",
            MessageType::StratuxAhrs => "Stratux - AHRS",
            MessageType::StratuxHeartbeatOld | MessageType::StratuxHeartbeat => {
                "Stratux - Heartbeat"
            }
            MessageType::ForeflightStatus => "Foreflight - Status",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
