//! Base dispatcher state and default handlers.
//!
//! [`EngineContext`] holds the session id and the dialect. Its handler
//! methods are the default reactions; custom handlers receive the context
//! too, so they can call the default and then customize the result.
//!
//! # Example
//!
//! ```
//! use stompwire::engine::Engine;
//! use stompwire::protocol::Dialect;
//!
//! let mut engine = Engine::builder(Dialect::V1_0)
//!     .on_message(|ctx, frame| {
//!         println!("got {}", frame.body_text());
//!         ctx.ack(frame)
//!     })
//!     .build();
//!
//! let reply = engine
//!     .react("MESSAGE\nmessage-id:m1\n\nhi\x00\n")
//!     .unwrap();
//! assert_eq!(reply, "ACK\nmessage-id: m1\n\n\x00\n");
//! ```

use std::fmt;
use std::sync::Arc;

use super::observer::{EngineEvent, EngineObserver};
use crate::builder::{v10, v11};
use crate::error::Result;
use crate::protocol::{Dialect, ParsedFrame, NO_RESPONSE_NEEDED};

/// Session state shared by all handlers of one engine.
pub struct EngineContext {
    dialect: Dialect,
    session_id: String,
    observer: Arc<dyn EngineObserver>,
}

impl EngineContext {
    pub(crate) fn new(dialect: Dialect, observer: Arc<dyn EngineObserver>) -> Self {
        Self {
            dialect,
            session_id: String::new(),
            observer,
        }
    }

    /// Dialect used to build replies.
    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Session id from the latest CONNECTED frame, empty before that.
    #[inline]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Default CONNECTED handler: record the `session` header.
    ///
    /// A later CONNECTED (e.g. after a reconnect) overwrites it.
    pub fn connected(&mut self, frame: &ParsedFrame) -> Result<String> {
        let session = frame.require_header("session")?;
        self.session_id = session.to_string();
        tracing::debug!(session = %self.session_id, "connected");
        Ok(NO_RESPONSE_NEEDED.to_string())
    }

    /// Default MESSAGE handler: acknowledge the message.
    ///
    /// Uses `message-id` (and `subscription` in 1.1) from the frame, plus the
    /// `transaction` or `transaction-id` header when present.
    pub fn ack(&self, frame: &ParsedFrame) -> Result<String> {
        let message_id = frame.require_header("message-id")?;
        let transaction = frame
            .header("transaction")
            .or_else(|| frame.header("transaction-id"));

        match self.dialect {
            Dialect::V1_0 => v10::ack(message_id, transaction),
            Dialect::V1_1 => {
                let subscription = frame.require_header("subscription")?;
                v11::ack(message_id, subscription, transaction)
            }
        }
    }

    /// Default ERROR handler: log the error and notify the observer.
    pub fn error(&self, frame: &ParsedFrame) -> Result<String> {
        let message = frame.header("message").unwrap_or_default().to_string();
        let body = frame.body_text().replace('\0', "");

        tracing::error!(message = %message, body = %body, "Received server error");
        self.observer.on_event(&EngineEvent::Error { message, body });

        Ok(NO_RESPONSE_NEEDED.to_string())
    }

    /// Default RECEIPT handler: log the receipt and notify the observer.
    pub fn receipt(&self, frame: &ParsedFrame) -> Result<String> {
        let receipt_id = frame.header("receipt-id").unwrap_or_default().to_string();
        let body = frame.body_text().replace('\0', "");

        tracing::info!(receipt_id = %receipt_id, "Received server receipt");
        self.observer.on_event(&EngineEvent::Receipt { receipt_id, body });

        Ok(NO_RESPONSE_NEEDED.to_string())
    }
}

impl fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("dialect", &self.dialect)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}
