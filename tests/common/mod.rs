//! Shared test helpers
//!
//! Hand-built response payloads and an in-process mock server that speaks
//! the framed protocol over a real TCP socket.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use photon_bridge::Config;

// =============================================================================
// Response Builders
// =============================================================================

pub fn nil() -> Vec<u8> {
    vec![0x00]
}

pub fn ok() -> Vec<u8> {
    vec![0x06]
}

pub fn str_value(s: &str) -> Vec<u8> {
    let mut out = vec![0x02];
    out.extend_from_slice(&(s.len() as u32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
    out
}

pub fn int_value(n: i64) -> Vec<u8> {
    let mut out = vec![0x03];
    out.extend_from_slice(&n.to_le_bytes());
    out
}

pub fn dbl_value(d: f64) -> Vec<u8> {
    let mut out = vec![0x04];
    out.extend_from_slice(&d.to_le_bytes());
    out
}

/// Array header followed by already-encoded elements
pub fn arr_value(items: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0x05];
    out.extend_from_slice(&(items.len() as u32).to_le_bytes());
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

pub fn err_value(code: u32, msg: &str) -> Vec<u8> {
    let mut out = vec![0x01];
    out.extend_from_slice(&code.to_le_bytes());
    out.extend_from_slice(&(msg.len() as u32).to_le_bytes());
    out.extend_from_slice(msg.as_bytes());
    out
}

/// Prefix a payload with its 4-byte length header
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut out = (payload.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(payload);
    out
}

/// Parse an encoded command back into its arguments
pub fn parse_request(bytes: &[u8]) -> Vec<String> {
    let read_u32 = |at: usize| u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap()) as usize;

    let argc = read_u32(0);
    let mut pos = 4;
    let mut args = Vec::with_capacity(argc);
    for _ in 0..argc {
        let len = read_u32(pos);
        pos += 4;
        args.push(String::from_utf8(bytes[pos..pos + len].to_vec()).unwrap());
        pos += len;
    }
    assert_eq!(pos, bytes.len(), "request has trailing bytes");
    args
}

// =============================================================================
// Mock Server
// =============================================================================

/// Serves a fixed number of connections, one request each
///
/// The handler gets the decoded request arguments and returns the raw bytes
/// to write back (usually `frame(payload)`), so malformed replies can be
/// produced too.
pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Vec<String>>>>,
    handle: Option<JoinHandle<()>>,
}

impl MockServer {
    pub fn start<F>(connections: usize, handler: F) -> Self
    where
        F: Fn(&[String]) -> Vec<u8> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            for _ in 0..connections {
                let (mut stream, _) = match listener.accept() {
                    Ok(conn) => conn,
                    Err(_) => return,
                };

                let mut header = [0u8; 4];
                if stream.read_exact(&mut header).is_err() {
                    continue;
                }
                let mut body = vec![0u8; u32::from_le_bytes(header) as usize];
                if stream.read_exact(&mut body).is_err() {
                    continue;
                }

                let args = parse_request(&body);
                seen.lock().unwrap().push(args.clone());

                let reply = handler(&args);
                let _ = stream.write_all(&reply);
            }
        });

        Self {
            addr,
            requests,
            handle: Some(handle),
        }
    }

    /// Answer every request with the same payload
    pub fn replying(connections: usize, payload: Vec<u8>) -> Self {
        Self::start(connections, move |_| frame(&payload))
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn config(&self) -> Config {
        Config::builder().host("127.0.0.1").port(self.port()).build()
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }

    /// Wait for the server to finish its connections
    pub fn join(mut self) -> Vec<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
        self.requests()
    }
}

/// A port with nothing listening on it
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
