//! Value definitions
//!
//! Represents decoded server responses.

use std::fmt;

use crate::error::{BridgeError, Result};

/// Response tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Nil = 0x00,
    Err = 0x01,
    Str = 0x02,
    Int = 0x03,
    Dbl = 0x04,
    Arr = 0x05,
    Ok = 0x06,
}

impl TryFrom<u8> for Tag {
    type Error = BridgeError;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Tag::Nil),
            0x01 => Ok(Tag::Err),
            0x02 => Ok(Tag::Str),
            0x03 => Ok(Tag::Int),
            0x04 => Ok(Tag::Dbl),
            0x05 => Ok(Tag::Arr),
            0x06 => Ok(Tag::Ok),
            _ => Err(BridgeError::Protocol(format!(
                "Unknown response tag: 0x{:02x}",
                byte
            ))),
        }
    }
}

/// A decoded response value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value (missing key, or SET acknowledged)
    Nil,

    /// Bare success marker
    Ok,

    /// UTF-8 text
    Str(String),

    /// Signed 64-bit integer
    Int(i64),

    /// IEEE-754 double
    Dbl(f64),

    /// Flat array; elements are only Nil, Str, Int or Dbl
    Arr(Vec<Value>),

    /// Error reported by the server
    Err { code: u32, message: String },
}

impl Value {
    /// The wire tag of this value
    pub fn tag(&self) -> Tag {
        match self {
            Value::Nil => Tag::Nil,
            Value::Ok => Tag::Ok,
            Value::Str(_) => Tag::Str,
            Value::Int(_) => Tag::Int,
            Value::Dbl(_) => Tag::Dbl,
            Value::Arr(_) => Tag::Arr,
            Value::Err { .. } => Tag::Err,
        }
    }

    /// Short lowercase name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Ok => "ok",
            Value::Str(_) => "str",
            Value::Int(_) => "int",
            Value::Dbl(_) => "dbl",
            Value::Arr(_) => "arr",
            Value::Err { .. } => "err",
        }
    }

    /// Turn a server error value into [`BridgeError::Server`]
    pub fn into_result(self) -> Result<Value> {
        match self {
            Value::Err { code, message } => Err(BridgeError::Server { code, message }),
            other => Ok(other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "(nil)"),
            Value::Ok => write!(f, "(ok)"),
            Value::Str(s) => write!(f, "(str) {}", s),
            Value::Int(n) => write!(f, "(int) {}", n),
            Value::Dbl(d) => write!(f, "(dbl) {}", d),
            Value::Err { code, message } => write!(f, "(err) {} {}", code, message),
            Value::Arr(items) => {
                write!(f, "(arr) len={}", items.len())?;
                for item in items {
                    write!(f, "\n{}", item)?;
                }
                write!(f, "\n(arr) end")
            }
        }
    }
}
