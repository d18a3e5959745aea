//! Session configuration.
//!
//! Holds what a transport needs to open a session: dialect, credentials,
//! virtual host and heart-beat settings. Loadable from JSON.
//!
//! # Example
//!
//! ```
//! use stompwire::config::SessionConfig;
//! use stompwire::protocol::Dialect;
//!
//! let config = SessionConfig::from_json(
//!     r#"{ "dialect": "1.0", "login": "bob", "passcode": "1234" }"#,
//! ).unwrap();
//!
//! assert_eq!(config.dialect, Dialect::V1_0);
//! assert_eq!(config.connect_frame(), "CONNECT\nlogin:bob\npasscode:1234\n\n\x00\n");
//! ```

use serde::{Deserialize, Serialize};

use crate::builder::{v10, v11, HeartBeat};
use crate::engine::{Engine, EngineBuilder};
use crate::error::Result;
use crate::protocol::{Dialect, StreamBuffer};

/// Default virtual host sent on a 1.1 CONNECT.
pub const DEFAULT_HOST: &str = "localhost";

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

/// Settings for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Protocol version.
    #[serde(default)]
    pub dialect: Dialect,
    /// Login name.
    pub login: String,
    /// Password.
    pub passcode: String,
    /// Virtual host (1.1 only).
    #[serde(default = "default_host")]
    pub host: String,
    /// Heart-beat settings (1.1 only).
    #[serde(default)]
    pub heart_beat: HeartBeat,
}

impl SessionConfig {
    /// Create a configuration with default host and heart-beat.
    pub fn new(dialect: Dialect, login: impl Into<String>, passcode: impl Into<String>) -> Self {
        Self {
            dialect,
            login: login.into(),
            passcode: passcode.into(),
            host: default_host(),
            heart_beat: HeartBeat::default(),
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// CONNECT text for the configured dialect.
    pub fn connect_frame(&self) -> String {
        match self.dialect {
            Dialect::V1_0 => v10::connect(&self.login, &self.passcode),
            Dialect::V1_1 => v11::connect(&self.login, &self.passcode, &self.host, self.heart_beat),
        }
    }

    /// Engine builder for the configured dialect.
    pub fn engine_builder(&self) -> EngineBuilder {
        Engine::builder(self.dialect)
    }

    /// Engine with default handlers for the configured dialect.
    pub fn engine(&self) -> Engine {
        Engine::new(self.dialect)
    }

    /// Stream buffer for the configured dialect.
    pub fn stream_buffer(&self) -> StreamBuffer {
        StreamBuffer::new(self.dialect)
    }
}
