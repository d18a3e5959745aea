//! # stompwire
//!
//! Transport-neutral codec and reactive dispatcher for the STOMP text
//! messaging protocol, dialects 1.0 and 1.1.
//!
//! The crate does no I/O. A transport feeds received bytes in and writes
//! the returned text out; it owns the socket, reconnects and threading.
//!
//! ## Architecture
//!
//! - **Protocol**: frame model, permissive parser and the stream buffer that
//!   reassembles frames from fragmented reads
//! - **Builders**: byte-exact wire text for every outgoing command, per dialect
//! - **Engine**: routes a received frame to a handler and returns the reply
//!
//! ## Example
//!
//! ```
//! use stompwire::builder::v10;
//! use stompwire::engine::Engine;
//! use stompwire::protocol::{Dialect, StreamBuffer};
//!
//! let mut buffer = StreamBuffer::new(Dialect::V1_0);
//! let mut engine = Engine::new(Dialect::V1_0);
//!
//! // Send this to the broker first.
//! let _connect = v10::connect("bob", "1234");
//!
//! // Bytes arrive from the socket in arbitrary chunks.
//! buffer.append_data(b"CONNECTED\nsession:ID:1\n\n\x00\nMESSAGE\nmessage-");
//! buffer.append_data(b"id:m1\n\nhello\x00\n");
//!
//! let mut replies = Vec::new();
//! while let Some(frame) = buffer.get_one_message() {
//!     let reply = engine.react(&frame).unwrap();
//!     if !reply.is_empty() {
//!         replies.push(reply);
//!     }
//! }
//!
//! assert_eq!(engine.session_id(), "ID:1");
//! assert_eq!(replies, vec!["ACK\nmessage-id: m1\n\n\x00\n".to_string()]);
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod protocol;

pub use config::SessionConfig;
pub use engine::{Engine, EngineBuilder};
pub use error::{Result, StompError};
pub use protocol::{unpack_frame, Command, Dialect, Frame, ParsedFrame, StreamBuffer};
