//! Protocol module - commands, framing, and frame types.
//!
//! This module implements the text wire format shared by both dialects:
//! - Command set and dialect selection
//! - Frame model with validated command plus a permissive parser
//! - Stream buffer for reassembling frames from partial reads

mod command;
mod frame;
mod stream_buffer;
mod wire_format;

pub use command::{Command, Dialect};
pub use frame::{unpack_frame, Frame, Headers, ParsedFrame};
pub use stream_buffer::{StreamBuffer, DEFAULT_CAPACITY};
pub use wire_format::{
    content_length, split_header_line, CONTENT_LENGTH, DEFAULT_MAX_CONTENT_LENGTH,
    HEADER_SEPARATOR, NO_RESPONSE_NEEDED, NULL, TERMINATOR,
};
