//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Frame Format (both directions)
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (4)  │         Payload             │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! ### Request Payload
//! - argc (4 bytes), then per argument: len (4 bytes) + UTF-8 bytes
//!
//! ### Response Payload
//! - tag (1 byte) + tag-specific body, see [`Tag`]

use std::io::{ErrorKind, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{BridgeError, Result};
use super::{Command, Tag, Value, WIRE_BYTE_ORDER};

/// Frame header size: 4 bytes length
pub const FRAME_HEADER_SIZE: usize = 4;

/// Maximum frame payload size (32 MB, same limit as the server)
pub const MAX_FRAME_SIZE: u32 = 32 << 20;

/// Upper bound on a single read call while receiving a frame body
pub const READ_CHUNK_SIZE: usize = 4096;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: argc (4) + [len (4) + arg]...
pub fn encode_command(command: &Command) -> Bytes {
    let args = command.args();
    let size = 4 + args.iter().map(|a| 4 + a.len()).sum::<usize>();

    let mut buf = BytesMut::with_capacity(size);
    buf.put_slice(&WIRE_BYTE_ORDER.u32_to_bytes(args.len() as u32));
    for arg in args {
        buf.put_slice(&WIRE_BYTE_ORDER.u32_to_bytes(arg.len() as u32));
        buf.put_slice(arg.as_bytes());
    }

    buf.freeze()
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Decode a response payload, turning a server error value into
/// [`BridgeError::Server`]
pub fn decode_response(payload: &[u8]) -> Result<Value> {
    decode_value(payload)?.into_result()
}

/// Decode a response payload as-is
///
/// Unlike [`decode_response`], an ERR tag comes back as [`Value::Err`].
/// The whole payload must be consumed by exactly one value.
pub fn decode_value(payload: &[u8]) -> Result<Value> {
    let mut reader = PayloadReader::new(payload);
    let value = decode_tagged(&mut reader, false)?;

    if reader.remaining() > 0 {
        return Err(BridgeError::Protocol(format!(
            "{} trailing bytes after {} value",
            reader.remaining(),
            value.type_name()
        )));
    }

    Ok(value)
}

/// Decode one tagged value at the reader's position
///
/// Array elements may only be NIL, STR, INT or DBL.
fn decode_tagged(reader: &mut PayloadReader<'_>, in_array: bool) -> Result<Value> {
    let offset = reader.position();
    let tag = Tag::try_from(reader.read_u8()?)?;

    match tag {
        Tag::Nil => Ok(Value::Nil),
        Tag::Str => Ok(Value::Str(reader.read_string()?)),
        Tag::Int => Ok(Value::Int(reader.read_i64()?)),
        Tag::Dbl => Ok(Value::Dbl(reader.read_f64()?)),
        _ if in_array => Err(BridgeError::UnsupportedShape(format!(
            "{:?} element at offset {} inside array",
            tag, offset
        ))),
        Tag::Ok => Ok(Value::Ok),
        Tag::Err => {
            let code = reader.read_u32()?;
            let message = reader.read_string()?;
            Ok(Value::Err { code, message })
        }
        Tag::Arr => {
            let count = reader.read_u32()? as usize;

            // Every element takes at least one byte
            let mut items = Vec::with_capacity(count.min(reader.remaining()));
            for _ in 0..count {
                items.push(decode_tagged(reader, true)?);
            }
            Ok(Value::Arr(items))
        }
    }
}

/// Bounds-checked cursor over a response payload
struct PayloadReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Take the next `n` bytes, or fail without moving
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(BridgeError::TruncatedPayload {
                offset: self.pos,
                needed: n,
                remaining,
            });
        }

        let buf = self.buf;
        let bytes = &buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(WIRE_BYTE_ORDER.u32_from_bytes(self.take_array()?))
    }

    fn read_i64(&mut self) -> Result<i64> {
        Ok(WIRE_BYTE_ORDER.i64_from_bytes(self.take_array()?))
    }

    fn read_f64(&mut self) -> Result<f64> {
        Ok(WIRE_BYTE_ORDER.f64_from_bytes(self.take_array()?))
    }

    /// Length-prefixed UTF-8 string
    fn read_string(&mut self) -> Result<String> {
        let offset = self.pos;
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;

        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| {
                BridgeError::Protocol(format!("Invalid UTF-8 in string at offset {}: {}", offset, e))
            })
    }
}

// =============================================================================
// Stream-based frame I/O
// =============================================================================

/// Write one frame (length header + payload) to a stream
///
/// `write_all` keeps writing until every byte is accepted, so partial
/// writes by the underlying stream are handled.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_FRAME_SIZE as usize {
        return Err(BridgeError::Protocol(format!(
            "Request too large: {} bytes (max {})",
            payload.len(),
            MAX_FRAME_SIZE
        )));
    }

    let mut frame = BytesMut::with_capacity(FRAME_HEADER_SIZE + payload.len());
    frame.put_slice(&WIRE_BYTE_ORDER.u32_to_bytes(payload.len() as u32));
    frame.put_slice(payload);

    writer
        .write_all(&frame)
        .map_err(|e| BridgeError::connection("sending request", e))?;
    writer
        .flush()
        .map_err(|e| BridgeError::connection("flushing request", e))?;

    Ok(())
}

/// Read one frame from a stream and return its payload
///
/// Blocks until the full frame is received, the stream ends, or an error
/// occurs.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Bytes> {
    let mut header = [0u8; FRAME_HEADER_SIZE];
    read_full(reader, &mut header, "response header")?;

    let payload_len = WIRE_BYTE_ORDER.u32_from_bytes(header);
    if payload_len > MAX_FRAME_SIZE {
        return Err(BridgeError::Protocol(format!(
            "Response too large: {} bytes (max {})",
            payload_len, MAX_FRAME_SIZE
        )));
    }

    let mut payload = vec![0u8; payload_len as usize];
    read_full(reader, &mut payload, "response body")?;

    Ok(Bytes::from(payload))
}

/// Fill `buf` completely, reading at most [`READ_CHUNK_SIZE`] bytes per call
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    let mut filled = 0;

    while filled < buf.len() {
        let end = (filled + READ_CHUNK_SIZE).min(buf.len());
        match reader.read(&mut buf[filled..end]) {
            Ok(0) => {
                return Err(BridgeError::ConnectionClosed(format!(
                    "stream ended after {} of {} {} bytes",
                    filled,
                    buf.len(),
                    what
                )))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(BridgeError::connection(format!("reading {}", what), e)),
        }
    }

    Ok(())
}
