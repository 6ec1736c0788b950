//! Configuration for photon-bridge
//!
//! Centralized configuration with sensible defaults. A [`Config`] is
//! resolved once at startup (defaults, then the JSON file, then the
//! environment) and handed to the client by value. There is no global
//! instance.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BridgeError, Result};

/// Environment variable naming the JSON config file
pub const CONFIG_PATH_ENV: &str = "PHOTON_BRIDGE_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Prefix of the per-field environment overrides
pub const ENV_PREFIX: &str = "PHOTON_BRIDGE_";

/// Main configuration for a bridge client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Server Configuration
    // -------------------------------------------------------------------------
    /// Photon server host
    pub host: String,

    /// Photon server port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Connect timeout (milliseconds), none by default
    pub connect_timeout_ms: Option<u64>,

    /// Read timeout (milliseconds), none by default
    pub read_timeout_ms: Option<u64>,

    /// Write timeout (milliseconds), none by default
    pub write_timeout_ms: Option<u64>,

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------
    /// Verbose logging of requests and responses
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1234,
            connect_timeout_ms: None,
            read_timeout_ms: None,
            write_timeout_ms: None,
            debug: false,
        }
    }
}

/// Fields accepted in the JSON config file; unknown keys are ignored
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    #[serde(alias = "photon-host")]
    host: Option<String>,
    #[serde(alias = "photon-port")]
    port: Option<u16>,
    debug: Option<bool>,
    connect_timeout_ms: Option<u64>,
    read_timeout_ms: Option<u64>,
    write_timeout_ms: Option<u64>,
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` of the server
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the config from the process environment
    ///
    /// Reads the file named by `PHOTON_BRIDGE_CONFIG` (or `config.json`)
    /// if it exists, then applies `PHOTON_BRIDGE_*` overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        Self::from_sources(Some(&path), |key| std::env::var(key).ok())
    }

    /// Resolve the config from an optional file and an environment lookup
    ///
    /// A missing file is skipped; an unreadable or malformed one is an error.
    pub fn from_sources<F>(file: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = file {
            if path.exists() {
                config.apply_file(path)?;
            } else {
                tracing::debug!("Config file {} not found, using defaults", path.display());
            }
        }

        config.apply_env(env)?;
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let file: ConfigFile = serde_json::from_str(&text).map_err(|e| {
            BridgeError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        tracing::debug!("Loaded config file {}", path.display());

        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(debug) = file.debug {
            self.debug = debug;
        }
        if file.connect_timeout_ms.is_some() {
            self.connect_timeout_ms = file.connect_timeout_ms;
        }
        if file.read_timeout_ms.is_some() {
            self.read_timeout_ms = file.read_timeout_ms;
        }
        if file.write_timeout_ms.is_some() {
            self.write_timeout_ms = file.write_timeout_ms;
        }

        Ok(())
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |field: &str| env(&format!("{}{}", ENV_PREFIX, field));

        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_env("PORT", &port)?;
        }
        if let Some(debug) = lookup("DEBUG") {
            self.debug = parse_bool("DEBUG", &debug)?;
        }
        if let Some(ms) = lookup("CONNECT_TIMEOUT_MS") {
            self.connect_timeout_ms = Some(parse_env("CONNECT_TIMEOUT_MS", &ms)?);
        }
        if let Some(ms) = lookup("READ_TIMEOUT_MS") {
            self.read_timeout_ms = Some(parse_env("READ_TIMEOUT_MS", &ms)?);
        }
        if let Some(ms) = lookup("WRITE_TIMEOUT_MS") {
            self.write_timeout_ms = Some(parse_env("WRITE_TIMEOUT_MS", &ms)?);
        }

        Ok(())
    }
}

fn parse_env<T>(field: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        BridgeError::Config(format!("invalid {}{}={:?}: {}", ENV_PREFIX, field, raw, e))
    })
}

fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(BridgeError::Config(format!(
            "invalid {}{}={:?}: expected a boolean",
            ENV_PREFIX, field, raw
        ))),
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = Some(ms);
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = Some(ms);
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = Some(ms);
        self
    }

    /// Enable or disable debug logging
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
