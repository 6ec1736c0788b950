//! Status report
//!
//! Health summary for the host's status resource, built from `KEYS`.

use serde::Serialize;

use crate::network::Client;

/// Online/offline summary of the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusReport {
    Online {
        key_count: usize,
        host: String,
        port: u16,
    },
    Offline {
        error: String,
    },
}

impl StatusReport {
    pub fn is_online(&self) -> bool {
        matches!(self, StatusReport::Online { .. })
    }
}

/// Query the server through `client`; any failure degrades to offline
pub fn status_report(client: &Client) -> StatusReport {
    match client.keys() {
        Ok(keys) => StatusReport::Online {
            key_count: keys.len(),
            host: client.host().to_string(),
            port: client.port(),
        },
        Err(e) => {
            tracing::warn!("Server {}:{} offline: {}", client.host(), client.port(), e);
            StatusReport::Offline {
                error: e.to_string(),
            }
        }
    }
}
