//! Protocol commands and dialects.
//!
//! A [`Dialect`] selects the protocol version. Each dialect owns a fixed set
//! of valid commands; frame validation, the stream buffer's resync step and
//! the dispatcher all consult the same set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StompError};

/// Protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dialect {
    /// STOMP 1.0.
    #[serde(rename = "1.0")]
    V1_0,
    /// STOMP 1.1.
    #[default]
    #[serde(rename = "1.1")]
    V1_1,
}

impl Dialect {
    /// Version string as sent in `accept-version`.
    pub fn version(&self) -> &'static str {
        match self {
            Dialect::V1_0 => "1.0",
            Dialect::V1_1 => "1.1",
        }
    }

    /// Commands a frame may carry in this dialect.
    pub fn valid_commands(&self) -> &'static [Command] {
        match self {
            Dialect::V1_0 => V10_COMMANDS,
            Dialect::V1_1 => V11_COMMANDS,
        }
    }

    /// Check whether `name` is a valid command in this dialect (exact, case-sensitive).
    pub fn is_valid_command(&self, name: &str) -> bool {
        name.parse::<Command>()
            .map(|cmd| cmd.is_valid_for(*self))
            .unwrap_or(false)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version())
    }
}

/// Every command known to any supported dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Command {
    Abort,
    Ack,
    Begin,
    Commit,
    Connect,
    Connected,
    Disconnect,
    Error,
    Message,
    Nack,
    Receipt,
    Send,
    Stomp,
    Subscribe,
    Unsubscribe,
}

const V10_COMMANDS: &[Command] = &[
    Command::Abort,
    Command::Ack,
    Command::Begin,
    Command::Commit,
    Command::Connect,
    Command::Connected,
    Command::Disconnect,
    Command::Message,
    Command::Send,
    Command::Subscribe,
    Command::Unsubscribe,
    Command::Receipt,
    Command::Error,
];

const V11_COMMANDS: &[Command] = &[
    Command::Abort,
    Command::Ack,
    Command::Begin,
    Command::Commit,
    Command::Connect,
    Command::Connected,
    Command::Disconnect,
    Command::Message,
    Command::Nack,
    Command::Send,
    Command::Stomp,
    Command::Subscribe,
    Command::Unsubscribe,
    Command::Receipt,
    Command::Error,
];

impl Command {
    /// Wire name of the command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Abort => "ABORT",
            Command::Ack => "ACK",
            Command::Begin => "BEGIN",
            Command::Commit => "COMMIT",
            Command::Connect => "CONNECT",
            Command::Connected => "CONNECTED",
            Command::Disconnect => "DISCONNECT",
            Command::Error => "ERROR",
            Command::Message => "MESSAGE",
            Command::Nack => "NACK",
            Command::Receipt => "RECEIPT",
            Command::Send => "SEND",
            Command::Stomp => "STOMP",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
        }
    }

    /// Check if this command belongs to the dialect's valid set.
    #[inline]
    pub fn is_valid_for(&self, dialect: Dialect) -> bool {
        dialect.valid_commands().contains(self)
    }

    /// Parse and validate a command name for a dialect.
    ///
    /// The name is upper-cased first, so `"send"` is accepted.
    pub fn parse_for(name: &str, dialect: Dialect) -> Result<Self> {
        let upper = name.to_ascii_uppercase();
        match upper.parse::<Command>() {
            Ok(cmd) if cmd.is_valid_for(dialect) => Ok(cmd),
            _ => Err(StompError::Frame(format!(
                "The cmd '{}' is not valid! It must be one of {:?} (STOMP v{})",
                upper,
                dialect
                    .valid_commands()
                    .iter()
                    .map(Command::as_str)
                    .collect::<Vec<_>>(),
                dialect
            ))),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = StompError;

    /// Exact match on the wire name. No dialect check.
    fn from_str(s: &str) -> Result<Self> {
        let cmd = match s {
            "ABORT" => Command::Abort,
            "ACK" => Command::Ack,
            "BEGIN" => Command::Begin,
            "COMMIT" => Command::Commit,
            "CONNECT" => Command::Connect,
            "CONNECTED" => Command::Connected,
            "DISCONNECT" => Command::Disconnect,
            "ERROR" => Command::Error,
            "MESSAGE" => Command::Message,
            "NACK" => Command::Nack,
            "RECEIPT" => Command::Receipt,
            "SEND" => Command::Send,
            "STOMP" => Command::Stomp,
            "SUBSCRIBE" => Command::Subscribe,
            "UNSUBSCRIBE" => Command::Unsubscribe,
            other => return Err(StompError::Frame(format!("Unknown command '{}'", other))),
        };
        Ok(cmd)
    }
}
