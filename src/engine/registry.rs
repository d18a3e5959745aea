//! Handler registry for dispatching frames by command.
//!
//! The table is closed: exactly four commands get a reaction, and every
//! slot is filled at construction with the default handler from
//! [`EngineContext`]. Slots can be replaced before the engine is built.

use super::context::EngineContext;
use crate::error::Result;
use crate::protocol::{Command, ParsedFrame};

/// Result type for handler functions: the reply text, possibly empty.
pub type HandlerResult = Result<String>;

/// Boxed handler function.
pub type HandlerFn = Box<dyn Fn(&mut EngineContext, &ParsedFrame) -> HandlerResult + Send + Sync>;

/// Commands the dispatcher reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    /// CONNECTED: record the session id.
    Connected,
    /// MESSAGE: acknowledge.
    Message,
    /// ERROR: log.
    Error,
    /// RECEIPT: log.
    Receipt,
}

impl Reaction {
    /// Map a command to its reaction, if it has one.
    pub fn for_command(cmd: Command) -> Option<Self> {
        match cmd {
            Command::Connected => Some(Reaction::Connected),
            Command::Message => Some(Reaction::Message),
            Command::Error => Some(Reaction::Error),
            Command::Receipt => Some(Reaction::Receipt),
            _ => None,
        }
    }
}

/// Fixed mapping from [`Reaction`] to handler.
pub struct HandlerRegistry {
    connected: HandlerFn,
    message: HandlerFn,
    error: HandlerFn,
    receipt: HandlerFn,
}

impl HandlerRegistry {
    /// Create a registry filled with the default handlers.
    pub fn new() -> Self {
        Self {
            connected: Box::new(|ctx: &mut EngineContext, frame: &ParsedFrame| ctx.connected(frame)),
            message: Box::new(|ctx: &mut EngineContext, frame: &ParsedFrame| ctx.ack(frame)),
            error: Box::new(|ctx: &mut EngineContext, frame: &ParsedFrame| ctx.error(frame)),
            receipt: Box::new(|ctx: &mut EngineContext, frame: &ParsedFrame| ctx.receipt(frame)),
        }
    }

    /// Replace the handler for a reaction.
    pub fn register<F>(&mut self, reaction: Reaction, handler: F)
    where
        F: Fn(&mut EngineContext, &ParsedFrame) -> HandlerResult + Send + Sync + 'static,
    {
        let handler: HandlerFn = Box::new(handler);
        match reaction {
            Reaction::Connected => self.connected = handler,
            Reaction::Message => self.message = handler,
            Reaction::Error => self.error = handler,
            Reaction::Receipt => self.receipt = handler,
        }
    }

    /// Get the handler for a reaction.
    pub fn get(&self, reaction: Reaction) -> &HandlerFn {
        match reaction {
            Reaction::Connected => &self.connected,
            Reaction::Message => &self.message,
            Reaction::Error => &self.error,
            Reaction::Receipt => &self.receipt,
        }
    }

    /// Get the handler for a command, if the command has a reaction.
    pub fn get_by_command(&self, cmd: Command) -> Option<&HandlerFn> {
        Reaction::for_command(cmd).map(|reaction| self.get(reaction))
    }

    /// Run the handler for `frame`'s command.
    ///
    /// Returns an empty reply for commands without a reaction; handler
    /// errors propagate.
    pub fn dispatch(&self, ctx: &mut EngineContext, frame: &ParsedFrame) -> HandlerResult {
        match frame.command().and_then(|cmd| self.get_by_command(cmd)) {
            Some(handler) => handler(ctx, frame),
            None => {
                tracing::debug!(cmd = %frame.cmd, "no handler, ignoring frame");
                Ok(String::new())
            }
        }
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
