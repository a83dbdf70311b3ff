//! Byte source trait for the poll-driven decode loop

use std::collections::VecDeque;

/// Source of raw telemetry bytes, polled by the decoder
///
/// Implementations wrap whatever physical layer delivers the meter stream,
/// typically a serial port read buffer. The decoder only ever consumes
/// bytes, so no backpressure signalling is needed.
pub trait ByteSource {
    /// Number of bytes currently available for reading
    fn available(&self) -> usize;

    /// Read one byte if available
    fn read_byte(&mut self) -> Option<u8>;
}

/// In-memory byte source backed by a queue
///
/// Hosts that read chunks from their physical layer can push them here and
/// hand the source to the decoder; tests use it to replay captured streams.
#[derive(Debug, Default)]
pub struct BufferedSource {
    queue: VecDeque<u8>,
}

impl BufferedSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Create a source preloaded with a captured stream
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            queue: bytes.iter().copied().collect(),
        }
    }

    /// Append received bytes to the queue
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.queue.extend(bytes.iter().copied());
    }
}

impl ByteSource for BufferedSource {
    fn available(&self) -> usize {
        self.queue.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.queue.pop_front()
    }
}
