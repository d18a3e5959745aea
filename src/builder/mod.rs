//! Command builders - ready-to-send wire text for each outgoing command.
//!
//! One module per dialect. The caller picks the dialect; builders never
//! negotiate. Each builder is a pure function:
//!
//! - [`v10`] - STOMP 1.0 formats (`name: value` with a space for most headers)
//! - [`v11`] - STOMP 1.1 formats (adds `id`, `subscription`, `content-type`,
//!   `accept-version`, `host`, `heart-beat`, `receipt`)
//!
//! # Design
//!
//! Builders return `String` when they cannot fail and `Result<String>` when a
//! required argument (destination, message id, transaction) may be empty.
//! `begin` generates a random transaction id when none is given.
//!
//! # Example
//!
//! ```
//! use stompwire::builder::{v10, v11, AckMode, HeartBeat};
//!
//! assert_eq!(
//!     v10::connect("bob", "1234"),
//!     "CONNECT\nlogin:bob\npasscode:1234\n\n\x00\n"
//! );
//!
//! let sub = v11::subscribe("/queue/all", 0, AckMode::Client).unwrap();
//! assert_eq!(sub, "SUBSCRIBE\nid:0\ndestination:/queue/all\nack:client\n\n\x00\n");
//!
//! let connect = v11::connect("bob", "123", "localhost", HeartBeat::default());
//! assert!(connect.starts_with("CONNECT\naccept-version:1.1\n"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StompError};

pub mod v10;
pub mod v11;

/// Acknowledgement mode requested on SUBSCRIBE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AckMode {
    /// The server considers messages delivered as soon as it sends them.
    #[default]
    Auto,
    /// Each message must be acknowledged; an ACK covers all earlier ones.
    Client,
    /// Each message must be acknowledged individually (1.1).
    ClientIndividual,
}

impl AckMode {
    /// Wire value of the `ack` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            AckMode::Auto => "auto",
            AckMode::Client => "client",
            AckMode::ClientIndividual => "client-individual",
        }
    }
}

impl fmt::Display for AckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heart-beat intervals in milliseconds sent on a 1.1 CONNECT.
///
/// `(0, 0)` means no heart-beating in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeartBeat {
    /// Smallest interval at which the client can send heart-beats.
    pub send_ms: u32,
    /// Interval at which the client would like to receive heart-beats.
    pub receive_ms: u32,
}

impl HeartBeat {
    /// Create heart-beat settings.
    pub fn new(send_ms: u32, receive_ms: u32) -> Self {
        Self {
            send_ms,
            receive_ms,
        }
    }
}

impl fmt::Display for HeartBeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.send_ms, self.receive_ms)
    }
}

/// Generate a random transaction id.
pub fn new_transaction_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Use the caller's transaction id, or generate one if absent or empty.
pub(crate) fn transaction_or_random(transaction: Option<&str>) -> String {
    match non_empty(transaction) {
        Some(id) => id.to_string(),
        None => new_transaction_id(),
    }
}

/// Treat an empty optional argument as absent.
#[inline]
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Reject an empty required argument.
pub(crate) fn required<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(StompError::Frame(format!("'{}' is required", name)));
    }
    Ok(value)
}
