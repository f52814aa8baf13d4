//! Per-frame bookkeeping: raw capture, decode, presentation, summary.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use gdl90_core::decode::{decode_frame, Message, MessageBody};
use gdl90_core::Result;

use crate::capture::CaptureWriter;

/// Drives the decode pipeline for one stream and accumulates run
/// statistics.
pub struct Processor {
    capture: Option<CaptureWriter>,
    json: bool,
    message_count: u64,
    bad_crc_count: u64,
    rejected_count: u64,
}

impl Processor {
    pub fn new(outfile: Option<&Path>, json: bool) -> Result<Processor> {
        let capture = outfile.map(CaptureWriter::create).transpose()?;
        Ok(Processor {
            capture,
            json,
            message_count: 0,
            bad_crc_count: 0,
            rejected_count: 0,
        })
    }

    /// Capture, decode, and present one complete flagged frame.
    pub fn process_frame(&mut self, frame: &[u8]) {
        if let Some(capture) = &mut self.capture {
            if let Err(e) = capture.write_frame(frame) {
                warn!("capture write failed: {e}");
            }
        }

        self.message_count += 1;
        let message = match decode_frame(frame) {
            Ok(message) => message,
            Err(e) => {
                self.rejected_count += 1;
                debug!(frame = self.message_count, "frame rejected: {e}");
                return;
            }
        };

        if !message.crc_valid {
            self.bad_crc_count += 1;
            debug!(
                expected = message.message_crc,
                computed = message.computed_crc,
                "CRC mismatch on {} message",
                if message.name().is_empty() {
                    "unknown"
                } else {
                    message.name()
                }
            );
            return;
        }

        self.present(&message);
    }

    fn present(&self, message: &Message) {
        if self.json {
            match serde_json::to_string(message) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("JSON encode failed: {e}"),
            }
            return;
        }

        match &message.body {
            MessageBody::Traffic(Some(report)) => {
                println!(
                    "{} {:07} TF: {:<8} ({:.5}, {:.5}) {} ft {} kts {:.0} deg",
                    unix_millis(),
                    self.message_count,
                    report.callsign,
                    report.latitude,
                    report.longitude,
                    report
                        .altitude_ft
                        .map_or_else(|| "---".to_string(), |a| a.to_string()),
                    report
                        .horizontal_velocity_kt
                        .map_or_else(|| "---".to_string(), |v| v.to_string()),
                    report.heading_deg,
                );
            }
            MessageBody::Heartbeat(Some(hb)) => {
                println!(
                    "{} {:07} HB: ts={}s counts={}",
                    unix_millis(),
                    self.message_count,
                    hb.timestamp,
                    hb.message_counts,
                );
            }
            _ => {}
        }
    }

    /// Flush any buffered capture bytes.
    pub fn finish(&mut self) -> Result<()> {
        if let Some(capture) = &mut self.capture {
            capture.flush()?;
        }
        Ok(())
    }

    /// End-of-run totals in the same shape the receiver logs have always
    /// used.
    pub fn print_summary(&self, elapsed: Duration, corruptions: u64, overflows: u64) {
        let millis = elapsed.as_millis().max(1);
        let rate = self.message_count as f64 / millis as f64 * 1000.0;
        let valid = self.message_count - self.bad_crc_count - self.rejected_count;
        let failed_pct = if self.message_count > 0 {
            self.bad_crc_count as f64 / self.message_count as f64 * 100.0
        } else {
            0.0
        };

        eprintln!(
            "Processed {} messages in {} ms, a rate of {:.2} messages per second.",
            self.message_count, millis, rate
        );
        eprintln!(
            "Valid CRC: {valid}. Failed CRC: {} ({failed_pct:.1}%). Rejected frames: {}.",
            self.bad_crc_count, self.rejected_count
        );
        eprintln!("Stream corruptions detected: {corruptions}. Oversized frames dropped: {overflows}.");
    }

    #[cfg(test)]
    fn counts(&self) -> (u64, u64, u64) {
        (self.message_count, self.bad_crc_count, self.rejected_count)
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
