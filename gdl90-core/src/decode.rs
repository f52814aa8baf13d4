//! Decode one synchronized frame into a typed GDL90 message.
//!
//! Steps: strip the flag bytes, unstuff the framed region, read the type
//! byte and the little-endian FCS, compute the CRC over everything before
//! the FCS, then dispatch to the typed field decoder. Unknown types still
//! produce a named, CRC-checked record.

use serde::Serialize;

use crate::crc;
use crate::heartbeat::Heartbeat;
use crate::stuffing;
use crate::traffic::TrafficReport;
use crate::types::{Gdl90Error, MessageType, Result};

// ---------------------------------------------------------------------------
// Decoded message
// ---------------------------------------------------------------------------

/// One decoded GDL90 message. Immutable after construction; owned by the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Raw message type code.
    pub type_code: u8,
    /// Catalog entry; `None` for codes the catalog does not list.
    pub message_type: Option<MessageType>,
    /// Type byte through last payload byte, FCS excluded.
    pub raw: Vec<u8>,
    /// FCS read from the frame.
    pub message_crc: u16,
    /// FCS computed over `raw`.
    pub computed_crc: u16,
    /// `computed_crc == message_crc`.
    pub crc_valid: bool,
    pub body: MessageBody,
}

/// Typed payload of a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MessageBody {
    /// Heartbeat status frame; `None` when CRC or length checks kept the
    /// fields from being decoded.
    Heartbeat(Option<Heartbeat>),
    /// Traffic report; `None` when CRC or length checks kept the fields
    /// from being decoded.
    Traffic(Option<TrafficReport>),
    /// Catalog-known type with no field decoder, or an unrecognized code.
    Unimplemented,
}

impl Message {
    /// Canonical name from the catalog, or an empty string for codes the
    /// catalog does not list.
    pub fn name(&self) -> &'static str {
        self.message_type.map(MessageType::name).unwrap_or("")
    }

    /// Field bytes after the type byte.
    pub fn fields(&self) -> &[u8] {
        &self.raw[1..]
    }
}

// ---------------------------------------------------------------------------
// Frame decoding
// ---------------------------------------------------------------------------

/// Decode a complete frame, including its leading and trailing flag
/// bytes.
///
/// Errors are single-frame conditions (malformed escape, too few bytes);
/// the caller counts them and moves on to the next frame. A CRC mismatch
/// is NOT an error: the record comes back with `crc_valid = false` and an
/// undecoded body.
pub fn decode_frame(frame: &[u8]) -> Result<Message> {
    let interior = frame
        .get(1..frame.len().saturating_sub(1))
        .unwrap_or_default();
    let logical = stuffing::unstuff(interior)?;
    if logical.len() < 3 {
        return Err(Gdl90Error::TruncatedMessage { len: logical.len() });
    }

    let (raw, fcs) = logical.split_at(logical.len() - 2);
    let type_code = raw[0];
    let message_type = MessageType::from_byte(type_code);
    let message_crc = u16::from_le_bytes([fcs[0], fcs[1]]);
    let computed_crc = crc::compute_crc(raw);
    let crc_valid = computed_crc == message_crc;

    let fields = &raw[1..];
    let body = match message_type {
        Some(MessageType::Heartbeat) => {
            MessageBody::Heartbeat(Heartbeat::decode(fields, crc_valid))
        }
        Some(MessageType::TrafficReport) => {
            MessageBody::Traffic(TrafficReport::decode(fields, crc_valid))
        }
        Some(_) | None => MessageBody::Unimplemented,
    };

    Ok(Message {
        type_code,
        message_type,
        raw: raw.to_vec(),
        message_crc,
        computed_crc,
        crc_valid,
        body,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
