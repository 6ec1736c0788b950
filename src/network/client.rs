//! Client Facade
//!
//! Named key-value operations over the raw command/response cycle.

use crate::config::Config;
use crate::error::{BridgeError, Result};
use crate::protocol::{decode_response, encode_command, Command, Value};
use super::Connection;

/// Client for the Photon server
///
/// Holds only immutable configuration, so one client can be shared across
/// threads; overlapping calls each open their own connection.
#[derive(Debug, Clone)]
pub struct Client {
    config: Config,
}

impl Client {
    /// Create a client for the server named by `config`
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Run an arbitrary command and return the decoded value
    ///
    /// A server error value comes back as [`BridgeError::Server`].
    pub fn execute<I, S>(&self, args: I) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send(&Command::raw(args))
    }

    /// Get a value by key, `None` if the key is missing
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let command = Command::get(key);
        match self.send(&command)? {
            Value::Str(value) => Ok(Some(value)),
            Value::Nil => Ok(None),
            other => Err(unexpected(&command, &other)),
        }
    }

    /// Set a key-value pair
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.send(&Command::set(key, value))?;
        Ok(())
    }

    /// Delete a key, returning how many keys were removed
    pub fn delete(&self, key: &str) -> Result<i64> {
        let command = Command::del(key);
        match self.send(&command)? {
            Value::Int(removed) => Ok(removed),
            other => Err(unexpected(&command, &other)),
        }
    }

    /// List every key on the server
    pub fn keys(&self) -> Result<Vec<String>> {
        let command = Command::keys();
        match self.send(&command)? {
            Value::Arr(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Str(key) => Ok(key),
                    other => Err(unexpected(&command, &other)),
                })
                .collect(),
            other => Err(unexpected(&command, &other)),
        }
    }

    /// Check the server is alive, returning its status text
    pub fn ping(&self) -> Result<String> {
        let command = Command::ping();
        match self.send(&command)? {
            Value::Ok => Ok("OK".to_string()),
            Value::Str(status) => Ok(status),
            other => Err(unexpected(&command, &other)),
        }
    }

    /// connect → encode → send → receive → decode → close
    fn send(&self, command: &Command) -> Result<Value> {
        let request = encode_command(command);

        let response = {
            let mut conn = Connection::open(&self.config)?;
            conn.round_trip(&request)?
        };

        let result = decode_response(&response);
        match &result {
            Ok(value) => {
                tracing::debug!("{} -> {} ({} bytes)", command.name(), value.type_name(), response.len())
            }
            Err(BridgeError::Server { code, message }) => {
                tracing::warn!("{} failed on server: {} {}", command.name(), code, message)
            }
            Err(e) => tracing::debug!("{} response rejected: {}", command.name(), e),
        }

        result
    }
}

fn unexpected(command: &Command, found: &Value) -> BridgeError {
    BridgeError::UnexpectedResponse {
        command: command.name().to_string(),
        found: found.type_name().to_string(),
    }
}
