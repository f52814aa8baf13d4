//! Frame synchronization over flag-delimited byte streams.
//!
//! Two scanners share the 0x7E delimiter semantics:
//! - [`extract_frames`]: one receive buffer assumed to hold zero or more
//!   complete frames (a UDP datagram).
//! - [`FrameSync`]: chunked input where a frame may span reads, with
//!   recovery for a missed flag (duplicated start) and for oversized
//!   frames.
//!
//! Frames are handed on including both flag bytes, in both modes.

use tracing::warn;

use crate::crc;
use crate::stuffing;
use crate::types::FLAG_BYTE;

/// Largest frame the streaming synchronizer will accumulate, flags
/// included. Anything longer is dropped and counted as an overflow.
pub const MAX_FRAME_LEN: usize = 4096;

// ---------------------------------------------------------------------------
// Buffer mode
// ---------------------------------------------------------------------------

/// Extract complete flag-delimited frames from one receive buffer.
///
/// The first flag opens a frame, the next one closes it (the returned
/// slice spans both), and scanning then requires a fresh flag to open the
/// next frame; a closing flag is never reused as an opener. Bytes before
/// the first flag and after an unterminated frame are ignored.
pub fn extract_frames(buf: &[u8]) -> Vec<&[u8]> {
    let mut frames = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &byte) in buf.iter().enumerate() {
        if byte != FLAG_BYTE {
            continue;
        }
        match start {
            None => start = Some(i),
            Some(s) => {
                frames.push(&buf[s..=i]);
                start = None;
            }
        }
    }

    frames
}

// ---------------------------------------------------------------------------
// Streaming mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    Idle,
    InFrame,
}

/// Stateful synchronizer for byte streams that arrive in arbitrary
/// chunks.
///
/// Owns one logical stream's accumulation buffer and recovery counters;
/// decode each concurrent stream with its own instance. Emitted frames
/// are owned vectors; nothing borrows from the caller's chunks.
pub struct FrameSync {
    state: SyncState,
    buf: Vec<u8>,
    corruption_count: u64,
    overflow_count: u64,
}

impl FrameSync {
    pub fn new() -> Self {
        FrameSync {
            state: SyncState::Idle,
            buf: Vec::with_capacity(MAX_FRAME_LEN),
            corruption_count: 0,
            overflow_count: 0,
        }
    }

    /// Feed one chunk, returning every frame completed by it.
    ///
    /// A flag while idle opens a frame. A flag right after the opening
    /// flag means a closing flag was lost somewhere upstream: the buffer
    /// is truncated back to a lone start flag (this flag takes over as
    /// the opener) and `corruption_count` increments. Any other flag
    /// closes the frame.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();

        for &byte in chunk {
            match self.state {
                SyncState::Idle => {
                    if byte == FLAG_BYTE {
                        self.buf.clear();
                        self.buf.push(byte);
                        self.state = SyncState::InFrame;
                    }
                }
                SyncState::InFrame => {
                    if byte == FLAG_BYTE {
                        if self.buf.len() == 1 {
                            self.corruption_count += 1;
                            warn!(
                                corruptions = self.corruption_count,
                                "duplicate start flag, resynchronizing"
                            );
                        } else {
                            self.buf.push(byte);
                            frames.push(std::mem::take(&mut self.buf));
                            self.state = SyncState::Idle;
                        }
                    } else if self.buf.len() >= MAX_FRAME_LEN - 1 {
                        // No room left for the closing flag: this frame
                        // cannot complete within bounds. Drop it whole and
                        // wait for the next flag.
                        self.overflow_count += 1;
                        warn!(
                            limit = MAX_FRAME_LEN,
                            "frame exceeds size limit, dropping and resynchronizing"
                        );
                        self.buf.clear();
                        self.state = SyncState::Idle;
                    } else {
                        self.buf.push(byte);
                    }
                }
            }
        }

        frames
    }

    /// Frames recovered after a duplicated start flag.
    pub fn corruption_count(&self) -> u64 {
        self.corruption_count
    }

    /// Oversized frames dropped.
    pub fn overflow_count(&self) -> u64 {
        self.overflow_count
    }
}

impl Default for FrameSync {
    fn default() -> Self {
        FrameSync::new()
    }
}

// ---------------------------------------------------------------------------
// Frame building (producer/test helper)
// ---------------------------------------------------------------------------

/// Build a complete wire frame: append the FCS, escape the result, wrap
/// it in flag bytes.
pub fn encode_frame(message: &[u8]) -> Vec<u8> {
    let stuffed = stuffing::stuff(&crc::append_crc(message));
    let mut frame = Vec::with_capacity(stuffed.len() + 2);
    frame.push(FLAG_BYTE);
    frame.extend_from_slice(&stuffed);
    frame.push(FLAG_BYTE);
    frame
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
