//! Network Module
//!
//! TCP transport and the client facade.
//!
//! ## Architecture
//! - Every call opens its own connection, exchanges one frame each way,
//!   and closes it
//! - No pooling and no state shared between calls
//! - Commands encoded and responses decoded by the protocol module

mod connection;
mod client;

pub use connection::Connection;
pub use client::Client;
