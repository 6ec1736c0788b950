//! Connection
//!
//! One TCP connection to the server, used for exactly one request/response
//! exchange and closed when dropped.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::Bytes;

use crate::config::Config;
use crate::error::{BridgeError, Result};
use crate::protocol::{read_frame, write_frame};

/// A single-use connection to the server
///
/// The stream is closed on drop, so every exit path of a call releases it.
pub struct Connection {
    /// TCP stream to the server
    stream: TcpStream,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to the server named by the config
    ///
    /// Applies the configured timeouts and disables Nagle's algorithm.
    pub fn open(config: &Config) -> Result<Self> {
        let addr = config.addr();

        let stream = match timeout(config.connect_timeout_ms) {
            Some(limit) => connect_with_timeout(&addr, limit)?,
            None => TcpStream::connect(&addr)
                .map_err(|e| BridgeError::connection(format!("connecting to {}", addr), e))?,
        };

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| addr.clone());

        // Disable Nagle's algorithm for low latency
        stream
            .set_nodelay(true)
            .map_err(|e| BridgeError::connection("configuring socket", e))?;

        let mut conn = Self { stream, peer_addr };
        conn.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;

        tracing::debug!("Connected to {}", conn.peer_addr);
        Ok(conn)
    }

    /// Configure read/write timeouts; `None` or zero leaves the call blocking
    pub fn set_timeouts(&mut self, read_ms: Option<u64>, write_ms: Option<u64>) -> Result<()> {
        self.stream
            .set_read_timeout(timeout(read_ms))
            .map_err(|e| BridgeError::connection("setting read timeout", e))?;
        self.stream
            .set_write_timeout(timeout(write_ms))
            .map_err(|e| BridgeError::connection("setting write timeout", e))?;
        Ok(())
    }

    /// Send one request frame and receive one response frame
    ///
    /// Returns the response payload with the length header stripped.
    pub fn round_trip(&mut self, request: &[u8]) -> Result<Bytes> {
        write_frame(&mut self.stream, request)?;
        tracing::trace!("Sent {} bytes to {}: {:?}", request.len(), self.peer_addr, request);

        let response = read_frame(&mut self.stream)?;
        tracing::trace!(
            "Received {} bytes from {}: {:?}",
            response.len(),
            self.peer_addr,
            &response[..]
        );

        Ok(response)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        tracing::debug!("Closing connection to {}", self.peer_addr);
    }
}

fn timeout(ms: Option<u64>) -> Option<Duration> {
    ms.filter(|&ms| ms > 0).map(Duration::from_millis)
}

/// Try each resolved address in turn, keeping the last failure
fn connect_with_timeout(addr: &str, limit: Duration) -> Result<TcpStream> {
    let candidates: Vec<SocketAddr> = addr
        .to_socket_addrs()
        .map_err(|e| BridgeError::connection(format!("resolving {}", addr), e))?
        .collect();

    let mut last_err = std::io::Error::new(
        ErrorKind::AddrNotAvailable,
        format!("{} resolved to no addresses", addr),
    );

    for candidate in candidates {
        match TcpStream::connect_timeout(&candidate, limit) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", candidate, e);
                last_err = e;
            }
        }
    }

    Err(BridgeError::connection(format!("connecting to {}", addr), last_err))
}
