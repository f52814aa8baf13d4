//! gdl90-core: Pure decode library for GDL90-framed telemetry.
//!
//! No sockets, no files — just the pipeline: frame synchronization over an
//! unstructured byte stream, byte-unstuffing, CRC-CCITT validation, and
//! bit-level field decoding of the structured payloads. This crate is the
//! shared core used by the `gdl90-console` binary.

pub mod crc;
pub mod decode;
pub mod framing;
pub mod heartbeat;
pub mod stuffing;
pub mod traffic;
pub mod types;

// Re-export commonly used types at crate root
pub use decode::{decode_frame, Message, MessageBody};
pub use framing::{extract_frames, FrameSync, MAX_FRAME_LEN};
pub use heartbeat::Heartbeat;
pub use traffic::TrafficReport;
pub use types::*;
