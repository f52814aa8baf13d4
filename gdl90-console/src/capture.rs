//! Raw-capture persistence: append received frames, byte for byte, to a
//! file for later replay through `read`.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use gdl90_core::Result;

/// Bytes accumulated since the last flush before forcing one.
const FLUSH_THRESHOLD: usize = 4096;

/// Appends exact flagged frame bytes to a capture file.
///
/// Frames are buffered and pushed to the file once [`FLUSH_THRESHOLD`]
/// bytes accumulate, and again on [`CaptureWriter::flush`] or drop.
pub struct CaptureWriter {
    writer: BufWriter<File>,
    unflushed: usize,
}

impl CaptureWriter {
    /// Open `path` for appending, creating it if needed.
    pub fn create(path: &Path) -> Result<CaptureWriter> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(CaptureWriter {
            writer: BufWriter::new(file),
            unflushed: 0,
        })
    }

    /// Append one frame, unmodified.
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.writer.write_all(frame)?;
        self.unflushed += frame.len();
        if self.unflushed >= FLUSH_THRESHOLD {
            debug!(bytes = self.unflushed, "flushing capture file");
            self.writer.flush()?;
            self.unflushed = 0;
        }
        Ok(())
    }

    /// Push everything buffered so far to the file.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.unflushed = 0;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.bin");

        let mut writer = CaptureWriter::create(&path).unwrap();
        writer.write_frame(&[0x7E, 0x00, 0x01, 0x7E]).unwrap();
        writer.write_frame(&[0x7E, 0x14, 0x7D, 0x5E, 0x7E]).unwrap();
        writer.flush().unwrap();

        let contents = std::fs::read(&path).unwrap();
        assert_eq!(
            contents,
            [0x7E, 0x00, 0x01, 0x7E, 0x7E, 0x14, 0x7D, 0x5E, 0x7E]
        );
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.bin");
        std::fs::write(&path, [0xAA, 0xBB]).unwrap();

        let mut writer = CaptureWriter::create(&path).unwrap();
        writer.write_frame(&[0x7E, 0x7E]).unwrap();
        writer.flush().unwrap();

        let contents = std::fs::read(&path).unwrap();
        assert_eq!(contents, [0xAA, 0xBB, 0x7E, 0x7E]);
    }

    #[test]
    fn test_threshold_triggers_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.bin");

        let mut writer = CaptureWriter::create(&path).unwrap();
        let big_frame = vec![0x55; FLUSH_THRESHOLD];
        writer.write_frame(&big_frame).unwrap();

        // Threshold reached: bytes must be visible without an explicit
        // flush or drop.
        let contents = std::fs::read(&path).unwrap();
        assert_eq!(contents.len(), FLUSH_THRESHOLD);
    }
}
