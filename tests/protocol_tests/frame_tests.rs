//! Frame Tests
//!
//! Tests for length-prefixed frame I/O over streams that read and write
//! in small pieces.

use std::io::{self, Cursor, Read, Write};

use photon_bridge::protocol::{read_frame, write_frame, MAX_FRAME_SIZE, READ_CHUNK_SIZE};
use photon_bridge::{BridgeError, ErrorKind};

// =============================================================================
// Helper Types
// =============================================================================

/// Accepts at most `max` bytes per write, failing once with `Interrupted`
struct TrickleWriter {
    data: Vec<u8>,
    max: usize,
    interrupted: bool,
    writes: usize,
}

impl TrickleWriter {
    fn new(max: usize) -> Self {
        Self {
            data: Vec::new(),
            max,
            interrupted: false,
            writes: 0,
        }
    }
}

impl Write for TrickleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.interrupted {
            self.interrupted = true;
            return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
        }
        let n = buf.len().min(self.max);
        self.data.extend_from_slice(&buf[..n]);
        self.writes += 1;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Returns at most `step` bytes per read and records the largest request
struct TrickleReader {
    data: Vec<u8>,
    pos: usize,
    step: usize,
    interrupted: bool,
    largest_request: usize,
}

impl TrickleReader {
    fn new(data: Vec<u8>, step: usize) -> Self {
        Self {
            data,
            pos: 0,
            step,
            interrupted: false,
            largest_request: 0,
        }
    }
}

impl Read for TrickleReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.largest_request = self.largest_request.max(buf.len());
        if !self.interrupted {
            self.interrupted = true;
            return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
        }
        let n = buf.len().min(self.step).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn framed(payload: &[u8]) -> Vec<u8> {
    let mut out = (payload.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(payload);
    out
}

// =============================================================================
// Write Tests
// =============================================================================

#[test]
fn test_write_frame_layout() {
    let mut buffer = Vec::new();
    write_frame(&mut buffer, b"hello").unwrap();

    assert_eq!(&buffer[..4], &[0x05, 0x00, 0x00, 0x00]);
    assert_eq!(&buffer[4..], b"hello");
}

#[test]
fn test_write_frame_partial_writes() {
    let payload: Vec<u8> = (0..=255).collect();
    let mut writer = TrickleWriter::new(3);

    write_frame(&mut writer, &payload).unwrap();

    assert_eq!(writer.data, framed(&payload));
    assert!(writer.writes > 1);
}

#[test]
fn test_write_frame_error_is_connection() {
    let err = write_frame(&mut BrokenPipe, b"x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(matches!(err, BridgeError::Connection { .. }));
}

// =============================================================================
// Read Tests
// =============================================================================

#[test]
fn test_read_frame() {
    let mut cursor = Cursor::new(framed(b"payload"));
    let payload = read_frame(&mut cursor).unwrap();
    assert_eq!(&payload[..], b"payload");
}

#[test]
fn test_read_empty_frame() {
    let mut cursor = Cursor::new(framed(b""));
    assert!(read_frame(&mut cursor).unwrap().is_empty());
}

#[test]
fn test_read_frame_partial_reads() {
    let payload: Vec<u8> = (0..200u8).collect();
    let mut reader = TrickleReader::new(framed(&payload), 1);

    let received = read_frame(&mut reader).unwrap();

    assert_eq!(&received[..], &payload[..]);
    assert_eq!(reader.pos, reader.data.len());
}

#[test]
fn test_read_frame_bounded_chunks() {
    let payload = vec![0xAB; READ_CHUNK_SIZE * 3 + 17];
    let mut reader = TrickleReader::new(framed(&payload), usize::MAX);

    let received = read_frame(&mut reader).unwrap();

    assert_eq!(received.len(), payload.len());
    assert!(reader.largest_request <= READ_CHUNK_SIZE);
}

#[test]
fn test_read_frame_leaves_following_bytes() {
    let mut bytes = framed(b"one");
    bytes.extend_from_slice(&framed(b"two"));
    let mut cursor = Cursor::new(bytes);

    assert_eq!(&read_frame(&mut cursor).unwrap()[..], b"one");
    assert_eq!(&read_frame(&mut cursor).unwrap()[..], b"two");
}

#[test]
fn test_short_header_is_connection_error() {
    let mut cursor = Cursor::new(vec![0x05, 0x00]);
    let err = read_frame(&mut cursor).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(matches!(err, BridgeError::ConnectionClosed(_)));
    assert!(err.to_string().contains("2 of 4"));
}

#[test]
fn test_short_body_is_connection_error() {
    let mut bytes = 10u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(b"abc");
    let mut cursor = Cursor::new(bytes);

    let err = read_frame(&mut cursor).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(err.to_string().contains("3 of 10"));
}

#[test]
fn test_empty_stream_is_connection_error() {
    let mut cursor = Cursor::new(Vec::new());
    assert_eq!(read_frame(&mut cursor).unwrap_err().kind(), ErrorKind::Connection);
}

#[test]
fn test_oversized_frame_rejected() {
    let mut cursor = Cursor::new((MAX_FRAME_SIZE + 1).to_le_bytes().to_vec());
    let err = read_frame(&mut cursor).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(err.to_string().contains("too large"));
}
