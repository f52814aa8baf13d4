//! gdl90-console: Console decoder for GDL90 telemetry streams.
//!
//! Listens on a UDP port (one datagram holds zero or more complete
//! frames) or replays a recorded byte stream from a file, decoding every
//! frame and printing traffic/heartbeat lines plus a run summary.

use std::io::Read;
use std::net::UdpSocket;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gdl90_core::framing::{extract_frames, FrameSync};

mod capture;
mod processor;

use processor::Processor;

/// Chunk size for recorded-stream replay, matching the frame size bound.
const READ_CHUNK: usize = 4096;

#[derive(Parser)]
#[command(name = "gdl90", version, about = "GDL90 stream decoder")]
struct Cli {
    /// Log protocol diagnostics (decode skips, corruption, overflow)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for GDL90 datagrams on a UDP port
    Listen {
        /// UDP port to listen on (4000 is the usual GDL90 feed)
        #[arg(long, default_value = "4000")]
        port: u16,

        /// Append every received frame, unmodified, to this file
        #[arg(long)]
        outfile: Option<PathBuf>,
    },

    /// Replay a recorded GDL90 byte stream from a file
    Read {
        /// Path to the recorded stream
        file: PathBuf,

        /// Append every extracted frame, unmodified, to this file
        #[arg(long)]
        outfile: Option<PathBuf>,

        /// Print decoded messages as JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Listen { port, outfile } => cmd_listen(port, outfile),
        Commands::Read {
            file,
            outfile,
            json,
        } => cmd_read(file, outfile, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Receive datagrams forever; each one goes through buffer-mode framing.
fn cmd_listen(port: u16, outfile: Option<PathBuf>) -> gdl90_core::Result<()> {
    let socket = UdpSocket::bind(("0.0.0.0", port))?;
    let mut processor = Processor::new(outfile.as_deref(), false)?;
    eprintln!("Listening for GDL90 datagrams on UDP port {port}...");

    let mut buf = [0u8; 65_535];
    loop {
        let (len, _peer) = socket.recv_from(&mut buf)?;
        for frame in extract_frames(&buf[..len]) {
            processor.process_frame(frame);
        }
    }
}

/// Replay a recorded stream chunk by chunk through a streaming
/// synchronizer, then print the run summary.
fn cmd_read(file: PathBuf, outfile: Option<PathBuf>, json: bool) -> gdl90_core::Result<()> {
    let mut input = std::fs::File::open(&file)?;
    let mut processor = Processor::new(outfile.as_deref(), json)?;
    let mut sync = FrameSync::new();
    let started = Instant::now();

    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = input.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        for frame in sync.push(&chunk[..n]) {
            processor.process_frame(&frame);
        }
    }

    processor.finish()?;
    processor.print_summary(started.elapsed(), sync.corruption_count(), sync.overflow_count());
    Ok(())
}
