//! Datagram transport - UDP listener for position frames.
//!
//! Binds a local UDP socket and treats each received datagram as one
//! complete frame (a JSON array of position records). Datagrams larger
//! than [`MAX_DATAGRAM_SIZE`] are truncated by the socket; peers are
//! expected to stay well under that.

use std::time::Duration;

use tokio::net::UdpSocket;

use crate::tracker::decode::FrameFormat;

use super::{Frame, Transport, TransportError};

/// Maximum datagram payload we accept.
pub const MAX_DATAGRAM_SIZE: usize = 4096;

/// UDP transport; one datagram = one frame.
pub struct DatagramTransport {
    /// Local bind address, e.g. `127.0.0.1:9999`.
    addr: String,
    socket: Option<UdpSocket>,
    buffer: Box<[u8; MAX_DATAGRAM_SIZE]>,
}

impl DatagramTransport {
    /// Create an unbound transport for the given local address.
    pub fn new(addr: String) -> Self {
        Self {
            addr,
            socket: None,
            buffer: Box::new([0u8; MAX_DATAGRAM_SIZE]),
        }
    }

    /// The local address this transport binds.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Transport for DatagramTransport {
    fn frame_format(&self) -> FrameFormat {
        FrameFormat::Array
    }

    async fn connect(&mut self) -> Result<(), TransportError> {
        let socket = UdpSocket::bind(&self.addr)
            .await
            .map_err(|e| TransportError::Bind {
                addr: self.addr.clone(),
                source: e,
            })?;
        tracing::info!(addr = %self.addr, "Datagram socket bound");
        self.socket = Some(socket);
        Ok(())
    }

    async fn receive_frame(&mut self, timeout: Duration) -> Result<Option<Frame>, TransportError> {
        let socket = self.socket.as_ref().ok_or(TransportError::NotConnected)?;

        match tokio::time::timeout(timeout, socket.recv(&mut self.buffer[..])).await {
            Ok(Ok(len)) => Ok(Some(self.buffer[..len].to_vec())),
            Ok(Err(e)) => Err(TransportError::Receive(e)),
            Err(_) => Ok(None),
        }
    }
}
