pub mod frame;
pub mod port;

pub use frame::*;
pub use level_traits::{Axis, LevelError, Result, Sample, SampleSource};
pub use port::PortConfig;

use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::time::Instant;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Unsynced,
    Streaming,
    Failed,
}

/// Turns the level's unframed byte stream into timestamped samples.
///
/// The reader aligns itself lazily on the first pull: it drops bytes up to
/// the next `X`, throws away the rest of that frame and then starts its
/// clock. After that every pull reads exactly one frame. A frame that does not
/// decode ends the stream for good; open the channel again to start over.
pub struct FrameReader<R: Read> {
    channel: R,
    state: ReaderState,
    start: Instant,
    tee: bool,
}

impl FrameReader<Box<dyn SerialPort>> {
    pub fn open(config: &PortConfig) -> Result<Self> {
        let port = port::open(config)?;
        Ok(FrameReader::new(port))
    }
}

impl<R: Read> FrameReader<R> {
    pub fn new(channel: R) -> Self {
        FrameReader {
            channel,
            state: ReaderState::Unsynced,
            start: Instant::now(),
            tee: true,
        }
    }

    /// Echo every decoded sample to stdout in the log column format.
    pub fn with_tee(mut self, tee: bool) -> Self {
        self.tee = tee;
        self
    }

    pub fn is_synced(&self) -> bool {
        self.state == ReaderState::Streaming
    }

    /// Aligns to a frame boundary and starts the clock. Returns how many bytes
    /// were dropped before the sync byte.
    pub fn sync(&mut self) -> Result<usize> {
        let mut skipped = 0;
        let mut byte = [0u8; 1];

        loop {
            match self.channel.read(&mut byte) {
                Ok(0) => {
                    self.state = ReaderState::Failed;
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "stream ended before a sync byte was seen",
                    )
                    .into());
                }
                Ok(_) if byte[0] == SYNC_BYTE => break,
                Ok(_) => skipped += 1,
                // A silent device just keeps us waiting here.
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    warn!("Timed out waiting for sync byte, still listening");
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.state = ReaderState::Failed;
                    return Err(e.into());
                }
            }
        }

        // The `X` we just consumed opened a frame we are now partway through.
        let stale = match self.read_chunk(FRAME_LEN - 1) {
            Ok(stale) => stale,
            Err(e) => {
                self.state = ReaderState::Failed;
                return Err(e.into());
            }
        };
        debug!(
            "Synced after skipping {} bytes, dropped {} bytes of the partial frame",
            skipped,
            stale.len()
        );

        self.start = Instant::now();
        self.state = ReaderState::Streaming;
        Ok(skipped)
    }

    /// Reads and decodes the next frame, syncing first if needed.
    pub fn next_sample(&mut self) -> Result<Sample> {
        match self.state {
            ReaderState::Unsynced => {
                self.sync()?;
            }
            ReaderState::Streaming => {}
            ReaderState::Failed => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    "frame reader has failed, reopen the channel to resync",
                )
                .into());
            }
        }

        let result = self
            .read_chunk(FRAME_LEN)
            .map_err(LevelError::from)
            .and_then(|datum| parse_frame(&datum));
        let (angle_x, angle_y) = match result {
            Ok(angles) => angles,
            Err(e) => {
                error!("{}", e);
                self.state = ReaderState::Failed;
                return Err(e);
            }
        };

        let sample = Sample::new(self.start.elapsed().as_secs_f64(), angle_x, angle_y);
        if self.tee {
            if let Err(e) = echo(io::stdout().lock(), &sample) {
                error!("Failed to echo sample to stdout: {}", e);
                self.state = ReaderState::Failed;
                return Err(e.into());
            }
        }
        Ok(sample)
    }

    /// Gives the channel back. Dropping the reader closes it instead.
    pub fn into_inner(self) -> R {
        self.channel
    }

    // Reads up to `len` bytes. A timeout or end of stream cuts the chunk short
    // and what arrived so far is returned for the parser to judge.
    fn read_chunk(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buffer = vec![0u8; len];
        let mut filled = 0;

        while filled < len {
            match self.channel.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }

        buffer.truncate(filled);
        Ok(buffer)
    }
}

fn echo<W: Write>(mut out: W, sample: &Sample) -> io::Result<()> {
    writeln!(out, "{}", format_sample(sample))?;
    out.flush()
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == ReaderState::Failed {
            return None;
        }
        Some(self.next_sample())
    }
}
