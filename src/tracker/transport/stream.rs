//! Stream transport - TCP client reading newline-delimited frames.
//!
//! Dials the peer and accumulates received bytes until a newline, then
//! yields the line as one frame (a single JSON object). Reads are done
//! in bounded chunks with `AsyncReadExt::read`, which is cancellation
//! safe, so a poll-quantum timeout never loses buffered bytes.

use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::tracker::decode::FrameFormat;

use super::{Frame, Transport, TransportError};

/// Read chunk size. Lines are far smaller; this just bounds syscalls.
const READ_CHUNK_SIZE: usize = 1024;

/// TCP transport; one newline-terminated line = one frame.
pub struct StreamTransport {
    /// Peer address, e.g. `127.0.0.1:8765`.
    addr: String,
    stream: Option<TcpStream>,
    /// Bytes received but not yet terminated by a newline.
    pending: Vec<u8>,
}

impl StreamTransport {
    /// Create an unconnected transport for the given peer address.
    pub fn new(addr: String) -> Self {
        Self {
            addr,
            stream: None,
            pending: Vec::new(),
        }
    }

    /// The peer address this transport dials.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Take one complete line out of the pending buffer, if present.
    fn take_line(&mut self) -> Option<Frame> {
        let newline = self.pending.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.pending.drain(..=newline).collect();
        line.pop(); // strip the newline itself
        Some(line)
    }
}

impl Transport for StreamTransport {
    fn frame_format(&self) -> FrameFormat {
        FrameFormat::Record
    }

    async fn connect(&mut self) -> Result<(), TransportError> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| TransportError::Connect {
                addr: self.addr.clone(),
                source: e,
            })?;
        tracing::info!(addr = %self.addr, "Stream connected");
        self.pending.clear();
        self.stream = Some(stream);
        Ok(())
    }

    async fn receive_frame(&mut self, timeout: Duration) -> Result<Option<Frame>, TransportError> {
        if self.stream.is_none() {
            return Err(TransportError::NotConnected);
        }

        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }

            let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
            match tokio::time::timeout(remaining, stream.read(&mut chunk)).await {
                Ok(Ok(0)) => return Err(TransportError::PeerClosed),
                Ok(Ok(n)) => self.pending.extend_from_slice(&chunk[..n]),
                Ok(Err(e)) => return Err(TransportError::Receive(e)),
                Err(_) => return Ok(None),
            }
        }
    }
}
