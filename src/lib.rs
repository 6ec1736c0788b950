//! # photon-bridge
//!
//! Client bridge exposing the Photon key-value server to a tool-calling host:
//! - Binary command encoder
//! - Tagged-value response decoder with bounds-checked reads
//! - Length-prefixed TCP frame transport, one connection per call
//! - Client facade for GET/SET/DEL/KEYS/ZAP
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Host / photon-cli                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Client                                  │
//! │            (named operations, reshaping)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Encoder   │          │   Decoder   │
//!   │  (Command)  │          │   (Value)   │
//!   └──────┬──────┘          └──────▲──────┘
//!          │                        │
//!          ▼                        │
//!   ┌─────────────────────────────────────┐
//!   │            Connection               │
//!   │      (frame write / frame read)     │
//!   └─────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod status;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BridgeError, ErrorKind, Result};
pub use config::Config;
pub use network::Client;
pub use protocol::Value;
pub use status::{status_report, StatusReport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of photon-bridge
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
