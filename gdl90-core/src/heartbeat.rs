//! Heartbeat (type 0x00) field decoding.
//!
//! Six field bytes: two status-flag bytes, a seconds-since-midnight
//! timestamp (16 bits LS byte first, MS bit carried in the second status
//! byte), and the message-count word.

use serde::Serialize;
use tracing::warn;

/// Expected heartbeat payload length, FCS excluded.
pub const HEARTBEAT_LEN: usize = 6;

/// Receiver status broadcast once per second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heartbeat {
    /// Position is available for ADS-B transmission.
    pub gps_pos_valid: bool,
    /// Receiver maintenance required.
    pub maint_required: bool,
    /// IDENT talkback.
    pub ident: bool,
    /// Address type talkback.
    pub addr_type: bool,
    /// GPS battery low voltage.
    pub gps_batt_low: bool,
    /// ATC services talkback.
    pub ratcs: bool,
    /// Receiver is initialized.
    pub uat_initialized: bool,
    /// CSA has been requested.
    pub csa_requested: bool,
    /// CSA is not available at this time.
    pub csa_not_available: bool,
    /// UTC timing is valid.
    pub utc_ok: bool,
    /// Seconds since 0000Z (17 significant bits).
    pub timestamp: u32,
    /// Messages received during the previous second.
    pub message_counts: u16,
}

impl Heartbeat {
    /// Decode the field bytes. `None` when the CRC failed or the length
    /// is off; the fields stay not-set.
    pub(crate) fn decode(fields: &[u8], crc_valid: bool) -> Option<Heartbeat> {
        if !crc_valid {
            return None;
        }
        if fields.len() != HEARTBEAT_LEN {
            warn!(
                expected = HEARTBEAT_LEN,
                actual = fields.len(),
                "unexpected heartbeat length, skipping field decode"
            );
            return None;
        }

        let status1 = fields[0];
        let status2 = fields[1];
        let ts_ms_bit = u32::from(status2 >> 7);

        Some(Heartbeat {
            gps_pos_valid: status1 & 0x80 != 0,
            maint_required: status1 & 0x40 != 0,
            ident: status1 & 0x20 != 0,
            addr_type: status1 & 0x10 != 0,
            gps_batt_low: status1 & 0x08 != 0,
            ratcs: status1 & 0x04 != 0,
            uat_initialized: status1 & 0x01 != 0,
            csa_requested: status2 & 0x40 != 0,
            csa_not_available: status2 & 0x20 != 0,
            utc_ok: status2 & 0x01 != 0,
            timestamp: ts_ms_bit << 16 | u32::from(fields[3]) << 8 | u32::from(fields[2]),
            message_counts: u16::from_be_bytes([fields[4], fields[5]]),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
