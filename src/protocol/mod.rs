//! Protocol Module
//!
//! Defines the wire protocol spoken by the Photon server.
//!
//! ## Framing
//! Every message in either direction is a frame:
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (4)  │         Payload             │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! ### Request Payload
//! ```text
//! ┌──────────┬──────────┬────────┬──────────┬────────┬─────┐
//! │ Argc (4) │ Len1 (4) │  Arg1  │ Len2 (4) │  Arg2  │ ... │
//! └──────────┴──────────┴────────┴──────────┴────────┴─────┘
//! ```
//!
//! ### Response Payload
//! One tag byte followed by the tag's body:
//! - 0x00: NIL - empty
//! - 0x01: ERR - code (4) + msg_len (4) + msg
//! - 0x02: STR - len (4) + bytes
//! - 0x03: INT - i64 (8)
//! - 0x04: DBL - f64 (8)
//! - 0x05: ARR - count (4) + elements (NIL/STR/INT/DBL only)
//! - 0x06: OK  - empty
//!
//! All multi-byte integers use [`WIRE_BYTE_ORDER`].

mod command;
mod value;
mod codec;

pub use command::Command;
pub use value::{Tag, Value};
pub use codec::{
    encode_command, decode_response, decode_value,
    read_frame, write_frame,
    MAX_FRAME_SIZE, READ_CHUNK_SIZE, FRAME_HEADER_SIZE,
};

/// Byte order of multi-byte integers on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// The byte order used for every length, count and number on the wire.
///
/// The server copies integers with a native-order `memcpy` and runs on
/// little-endian hosts. Integration tests against a live server should
/// check this first.
pub const WIRE_BYTE_ORDER: ByteOrder = ByteOrder::Little;

impl ByteOrder {
    pub fn u32_to_bytes(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    pub fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }

    pub fn i64_to_bytes(self, value: i64) -> [u8; 8] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    pub fn i64_from_bytes(self, bytes: [u8; 8]) -> i64 {
        match self {
            ByteOrder::Little => i64::from_le_bytes(bytes),
            ByteOrder::Big => i64::from_be_bytes(bytes),
        }
    }

    pub fn f64_to_bytes(self, value: f64) -> [u8; 8] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    pub fn f64_from_bytes(self, bytes: [u8; 8]) -> f64 {
        match self {
            ByteOrder::Little => f64::from_le_bytes(bytes),
            ByteOrder::Big => f64::from_be_bytes(bytes),
        }
    }
}
