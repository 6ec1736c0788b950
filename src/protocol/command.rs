//! Command definitions
//!
//! A command is the ordered argument vector sent to the server.

/// A command to send to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    args: Vec<String>,
}

impl Command {
    /// Build a command from arbitrary arguments
    pub fn raw<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// GET key
    pub fn get(key: &str) -> Self {
        Self::raw(["GET", key])
    }

    /// SET key value
    pub fn set(key: &str, value: &str) -> Self {
        Self::raw(["SET", key, value])
    }

    /// DEL key
    pub fn del(key: &str) -> Self {
        Self::raw(["DEL", key])
    }

    /// KEYS
    pub fn keys() -> Self {
        Self::raw(["KEYS"])
    }

    /// ZAP (liveness check, the server answers "ZING")
    pub fn ping() -> Self {
        Self::raw(["ZAP"])
    }

    /// The argument vector, command name first
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The command name, or an empty string for an empty command
    pub fn name(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }
}
