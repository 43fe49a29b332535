use std::time::Duration;

use bytes::{Buf, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

/// End-of-request terminator: two consecutive CRLFs.
const END_OF_REQUEST: &[u8] = b"\r\n\r\n";

/// How much to receive on each read.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Outcome of one `next_frame` call.
#[derive(Debug)]
pub enum Frame {
    /// One complete request, terminator stripped.
    Complete(Bytes),
    /// Peer closed before a terminator arrived.
    Closed,
    /// A read blocked past the timeout before a terminator arrived.
    /// Buffered partial bytes are kept and visible via `has_pending`.
    TimedOut,
}

/// Incremental frame detection over a connection's byte stream.
///
/// Owns the per-connection accumulating buffer. No byte is framed twice and
/// none are dropped: a frame is split out of the buffer exactly once, and
/// anything received after the terminator stays buffered for the next call.
/// Safe to call repeatedly until `Closed`.
pub struct Framer {
    buffer: BytesMut,
    chunk: Vec<u8>,
    recv_timeout: Duration,
}

impl Framer {
    pub fn new(recv_timeout: Duration) -> Self {
        Self::with_buffer_size(recv_timeout, DEFAULT_BUFFER_SIZE)
    }

    /// A small `buffer_size` forces many reads per request, useful for
    /// exercising the resumable path.
    pub fn with_buffer_size(recv_timeout: Duration, buffer_size: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(buffer_size),
            chunk: vec![0u8; buffer_size],
            recv_timeout,
        }
    }

    /// Whether bytes have been received but not yet framed.
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Returns the next complete frame, reading more data as needed.
    ///
    /// Each individual read is bounded by the receive timeout. A zero-byte
    /// read before a terminator is found means the peer closed.
    pub async fn next_frame<R>(&mut self, stream: &mut R) -> std::io::Result<Frame>
    where
        R: AsyncRead + Unpin,
    {
        loop {
            // A previous read may already hold a complete request.
            if let Some(end) = find_terminator(&self.buffer) {
                let frame = self.buffer.split_to(end).freeze();
                self.buffer.advance(END_OF_REQUEST.len());
                return Ok(Frame::Complete(frame));
            }

            let n = match timeout(self.recv_timeout, stream.read(&mut self.chunk)).await {
                Ok(read) => read?,
                Err(_) => return Ok(Frame::TimedOut),
            };
            if n == 0 {
                return Ok(Frame::Closed);
            }
            self.buffer.extend_from_slice(&self.chunk[..n]);
        }
    }
}

fn find_terminator(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(END_OF_REQUEST.len())
        .position(|window| window == END_OF_REQUEST)
}
