//! Engine module - reactive dispatch of received frames.
//!
//! Provides:
//! - [`Engine`] - routes a received frame to its handler and returns the reply
//! - [`EngineBuilder`] - replaces default handlers and installs an observer
//! - [`EngineContext`] - session state plus the default handlers
//! - [`HandlerRegistry`] - fixed command-to-handler table
//!
//! The engine is a command router, not a connection state machine. It
//! reacts to CONNECTED (records the session id), MESSAGE (replies with an
//! ACK), ERROR and RECEIPT (log, reply empty). Anything else gets an empty
//! reply.
//!
//! # Example
//!
//! ```
//! use stompwire::engine::Engine;
//! use stompwire::protocol::Dialect;
//!
//! let mut engine = Engine::new(Dialect::V1_0);
//!
//! let reply = engine
//!     .react("CONNECTED\nsession:ID:snorky.local-49191-1185461799654-3:18\n\n\x00\n")
//!     .unwrap();
//! assert_eq!(reply, "");
//! assert_eq!(engine.session_id(), "ID:snorky.local-49191-1185461799654-3:18");
//!
//! let reply = engine
//!     .react("MESSAGE\ndestination: /queue/a\nmessage-id: some-message-id\n\nhello queue a\n\n\x00\n")
//!     .unwrap();
//! assert_eq!(reply, "ACK\nmessage-id: some-message-id\n\n\x00\n");
//! ```

mod context;
mod observer;
mod registry;

use std::borrow::Cow;
use std::sync::Arc;

use bytes::Bytes;

pub use context::EngineContext;
pub use observer::{EngineEvent, EngineObserver, NoopObserver, RecordingObserver};
pub use registry::{HandlerFn, HandlerRegistry, HandlerResult, Reaction};

use crate::error::{Result, StompError};
use crate::protocol::{unpack_frame, Dialect, Frame, ParsedFrame};

/// Input accepted by [`Engine::react`].
#[derive(Debug, Clone)]
pub enum Inbound<'a> {
    /// Raw wire text, parsed before dispatch.
    Text(&'a str),
    /// Raw wire bytes; must be UTF-8.
    Raw(&'a [u8]),
    /// Already parsed frame.
    Parsed(Cow<'a, ParsedFrame>),
}

impl<'a> From<&'a str> for Inbound<'a> {
    fn from(text: &'a str) -> Self {
        Inbound::Text(text)
    }
}

impl<'a> From<&'a String> for Inbound<'a> {
    fn from(text: &'a String) -> Self {
        Inbound::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Inbound<'a> {
    fn from(raw: &'a [u8]) -> Self {
        Inbound::Raw(raw)
    }
}

impl<'a> From<&'a Bytes> for Inbound<'a> {
    fn from(raw: &'a Bytes) -> Self {
        Inbound::Raw(raw)
    }
}

impl<'a> From<&'a ParsedFrame> for Inbound<'a> {
    fn from(frame: &'a ParsedFrame) -> Self {
        Inbound::Parsed(Cow::Borrowed(frame))
    }
}

impl From<ParsedFrame> for Inbound<'static> {
    fn from(frame: ParsedFrame) -> Self {
        Inbound::Parsed(Cow::Owned(frame))
    }
}

impl From<&Frame> for Inbound<'static> {
    fn from(frame: &Frame) -> Self {
        Inbound::Parsed(Cow::Owned(frame.to_parsed()))
    }
}

/// Reactive dispatcher for one connection.
///
/// Not meant to be shared between concurrent callers.
pub struct Engine {
    context: EngineContext,
    registry: HandlerRegistry,
}

impl Engine {
    /// Create an engine with the default handlers and no observer.
    pub fn new(dialect: Dialect) -> Self {
        Self::builder(dialect).build()
    }

    /// Create a builder for customizing handlers.
    pub fn builder(dialect: Dialect) -> EngineBuilder {
        EngineBuilder::new(dialect)
    }

    /// Dialect used for replies.
    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.context.dialect()
    }

    /// Session id from the latest CONNECTED frame, empty before that.
    #[inline]
    pub fn session_id(&self) -> &str {
        self.context.session_id()
    }

    /// Shared state and default handlers.
    #[inline]
    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    /// React to a received frame.
    ///
    /// Accepts wire text, wire bytes, or a parsed frame. Returns the reply
    /// to send back, empty if none is needed (including for commands the
    /// engine does not handle). Handler errors, such as a MESSAGE without a
    /// `message-id`, propagate to the caller.
    pub fn react<'a>(&mut self, msg: impl Into<Inbound<'a>>) -> Result<String> {
        let frame = match msg.into() {
            Inbound::Text(text) => Cow::Owned(unpack_frame(text)),
            Inbound::Raw(raw) => {
                let text = std::str::from_utf8(raw).map_err(|e| {
                    StompError::UnsupportedInput(format!("frame is not UTF-8 text: {}", e))
                })?;
                Cow::Owned(unpack_frame(text))
            }
            Inbound::Parsed(frame) => frame,
        };

        self.registry.dispatch(&mut self.context, &frame)
    }
}

/// Builder for configuring an [`Engine`].
///
/// Custom handlers receive the [`EngineContext`], so they can run the
/// default behavior (`ctx.ack(frame)`) and then adjust the reply.
pub struct EngineBuilder {
    dialect: Dialect,
    observer: Arc<dyn EngineObserver>,
    registry: HandlerRegistry,
}

impl EngineBuilder {
    /// Create a builder with default handlers and no observer.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            observer: Arc::new(NoopObserver),
            registry: HandlerRegistry::new(),
        }
    }

    /// Install an observer for ERROR and RECEIPT events.
    pub fn observer(mut self, observer: Arc<dyn EngineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the CONNECTED handler.
    pub fn on_connected<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut EngineContext, &ParsedFrame) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register(Reaction::Connected, handler);
        self
    }

    /// Replace the MESSAGE handler.
    pub fn on_message<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut EngineContext, &ParsedFrame) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register(Reaction::Message, handler);
        self
    }

    /// Replace the ERROR handler.
    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut EngineContext, &ParsedFrame) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register(Reaction::Error, handler);
        self
    }

    /// Replace the RECEIPT handler.
    pub fn on_receipt<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut EngineContext, &ParsedFrame) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register(Reaction::Receipt, handler);
        self
    }

    /// Build the engine.
    pub fn build(self) -> Engine {
        Engine {
            context: EngineContext::new(self.dialect, self.observer),
            registry: self.registry,
        }
    }
}
