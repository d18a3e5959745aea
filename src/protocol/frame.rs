//! Frame model and the permissive frame parser.
//!
//! Two stages are kept apart:
//! - [`unpack_frame`] never fails. It turns text into a [`ParsedFrame`]
//!   without checking the command.
//! - [`Frame`] validates its command against the dialect's valid set and
//!   fails with [`StompError::Frame`] otherwise.
//!
//! # Example
//!
//! ```
//! use stompwire::protocol::{Dialect, Frame};
//!
//! let mut frame = Frame::new(Dialect::V1_1);
//! frame.set_command("MESSAGE").unwrap();
//! frame.set_header("destination", "/queue/a");
//! frame.set_header("message-id", "card_data");
//! frame.set_body("hello queue a");
//!
//! let packed = frame.pack().unwrap();
//! assert_eq!(
//!     &packed[..],
//!     b"MESSAGE\ndestination:/queue/a\nmessage-id:card_data\n\nhello queue a\x00\n"
//! );
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;

use bytes::{BufMut, Bytes, BytesMut};

use super::command::{Command, Dialect};
use super::wire_format::{split_header_line, NULL, TERMINATOR};
use crate::error::{Result, StompError};

/// Header mapping. Keys are unique and iterate in ascending order, which
/// gives `pack` a deterministic output.
pub type Headers = BTreeMap<String, String>;

/// Raw three-part frame as produced by the parser or the stream buffer.
///
/// `cmd` is not validated; use [`ParsedFrame::command`] or assign it into a
/// [`Frame`] to check it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFrame {
    /// Command line, verbatim.
    pub cmd: String,
    /// Parsed headers (last duplicate wins).
    pub headers: Headers,
    /// Body bytes with the terminator removed.
    pub body: Bytes,
}

impl ParsedFrame {
    /// Get a header value.
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Get a header value, failing with [`StompError::MissingHeader`] if absent.
    pub fn require_header(&self, name: &str) -> Result<&str> {
        self.header(name)
            .ok_or_else(|| StompError::MissingHeader(name.to_string()))
    }

    /// Get the command if it names a known command.
    pub fn command(&self) -> Option<Command> {
        self.cmd.parse().ok()
    }

    /// Body as text (lossy for non-UTF-8 bodies).
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Parse one frame's worth of text.
///
/// The first line is the command. Following non-blank lines are headers,
/// split at the first colon with both sides trimmed; a later duplicate
/// replaces an earlier one. After the first blank line every non-blank line
/// is trimmed and appended to the body with no separator, then NUL bytes
/// are removed from the result.
///
/// Never fails: malformed input yields empty or partial fields. A body line
/// shaped like `key:value` before any blank line is read as a header.
pub fn unpack_frame(message: impl AsRef<[u8]>) -> ParsedFrame {
    let message = message.as_ref();
    let mut lines = message.split(|&b| b == b'\n');

    let cmd = lines
        .next()
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .unwrap_or_default();

    let mut headers = Headers::new();
    let mut body = Vec::new();
    let mut in_body = false;

    for line in lines {
        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            in_body = true;
            continue;
        }
        if in_body {
            body.extend_from_slice(trimmed);
        } else if let Some((name, value)) = split_header_line(line) {
            headers.insert(name, value);
        }
    }

    body.retain(|&b| b != NULL);

    ParsedFrame {
        cmd,
        headers,
        body: Bytes::from(body),
    }
}

/// A validated protocol frame.
///
/// Constructed empty, populated through setters or [`Frame::unpack`], and
/// serialized on demand with [`Frame::pack`]. Header values are not escaped;
/// callers must not embed `\n` in them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    dialect: Dialect,
    command: Option<Command>,
    /// Frame headers.
    pub headers: Headers,
    /// Frame body (arbitrary bytes).
    pub body: Bytes,
}

impl Frame {
    /// Create an empty frame for a dialect.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            command: None,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Create a frame with its command already set.
    pub fn with_command(dialect: Dialect, cmd: &str) -> Result<Self> {
        let mut frame = Self::new(dialect);
        frame.set_command(cmd)?;
        Ok(frame)
    }

    /// The dialect whose command set this frame validates against.
    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The command, if one has been assigned.
    #[inline]
    pub fn command(&self) -> Option<Command> {
        self.command
    }

    /// Assign the command.
    ///
    /// The name is upper-cased, then checked against the dialect's valid
    /// set. On failure the frame is left unchanged.
    pub fn set_command(&mut self, cmd: &str) -> Result<()> {
        self.command = Some(Command::parse_for(cmd, self.dialect)?);
        Ok(())
    }

    /// Insert or replace a header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Serialize to wire bytes.
    ///
    /// `COMMAND\n` + sorted `name:value\n` lines + `\n` + body + `\x00\n`.
    /// Fails if no command has been assigned.
    pub fn pack(&self) -> Result<Bytes> {
        let cmd = self
            .command
            .ok_or_else(|| StompError::Frame("Cannot pack a frame without a command".into()))?;

        let headers_len: usize = self
            .headers
            .iter()
            .map(|(k, v)| k.len() + v.len() + 2)
            .sum();
        let mut buf = BytesMut::with_capacity(
            cmd.as_str().len() + 2 + headers_len + self.body.len() + TERMINATOR.len(),
        );

        buf.put_slice(cmd.as_str().as_bytes());
        buf.put_u8(b'\n');
        for (name, value) in &self.headers {
            buf.put_slice(name.as_bytes());
            buf.put_u8(b':');
            buf.put_slice(value.as_bytes());
            buf.put_u8(b'\n');
        }
        buf.put_u8(b'\n');
        buf.put_slice(&self.body);
        buf.put_slice(TERMINATOR);

        Ok(buf.freeze())
    }

    /// Populate this frame from wire text.
    ///
    /// Fails on empty input, or if the parsed command is not valid for the
    /// dialect; in both cases the frame is left unchanged. Returns the raw
    /// parse result.
    pub fn unpack(&mut self, message: impl AsRef<[u8]>) -> Result<ParsedFrame> {
        let message = message.as_ref();
        if message.is_empty() {
            return Err(StompError::Frame(
                "Unpack error! The given message is empty".into(),
            ));
        }

        let parsed = unpack_frame(message);
        self.set_command(&parsed.cmd)?;
        self.headers = parsed.headers.clone();
        self.body = parsed.body.clone();

        Ok(parsed)
    }

    /// View this frame as a [`ParsedFrame`].
    pub fn to_parsed(&self) -> ParsedFrame {
        ParsedFrame {
            cmd: self
                .command
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn message_frame() -> Frame {
        let mut frame = Frame::with_command(Dialect::V1_1, "MESSAGE").unwrap();
        frame.set_header("destination", "/queue/a");
        frame.set_header("message-id", "card_data");
        frame.set_body("hello queue a");
        frame
    }

    #[test]
    fn test_set_invalid_command_fails() {
        let mut frame = Frame::new(Dialect::V1_0);
        let err = frame.set_command("SOME UNKNOWN CMD").unwrap_err();
        assert!(matches!(err, StompError::Frame(_)));
        assert_eq!(frame.command(), None);
    }

    #[test]
    fn test_invalid_command_keeps_previous() {
        let mut frame = Frame::with_command(Dialect::V1_0, "SEND").unwrap();
        assert!(frame.set_command("NACK").is_err());
        assert_eq!(frame.command(), Some(Command::Send));
    }

    #[test]
    fn test_set_command_uppercases() {
        let frame = Frame::with_command(Dialect::V1_0, "subscribe").unwrap();
        assert_eq!(frame.command(), Some(Command::Subscribe));
    }

    #[test]
    fn test_pack_sorted_headers() {
        let packed = message_frame().pack().unwrap();
        assert_eq!(
            &packed[..],
            b"MESSAGE\ndestination:/queue/a\nmessage-id:card_data\n\nhello queue a\x00\n"
        );
    }

    #[test]
    fn test_pack_no_headers() {
        let frame = Frame::with_command(Dialect::V1_1, "DISCONNECT").unwrap();
        assert_eq!(&frame.pack().unwrap()[..], b"DISCONNECT\n\n\x00\n");
    }

    #[test]
    fn test_pack_without_command_fails() {
        let frame = Frame::new(Dialect::V1_0);
        assert!(matches!(frame.pack(), Err(StompError::Frame(_))));
    }

    #[test]
    fn test_unpack_empty_fails() {
        let mut frame = Frame::new(Dialect::V1_1);
        assert!(matches!(frame.unpack(""), Err(StompError::Frame(_))));
        assert!(matches!(frame.unpack(b""), Err(StompError::Frame(_))));
    }

    #[test]
    fn test_unpack_invalid_command_leaves_frame() {
        let mut frame = message_frame();
        let before = frame.clone();
        let err = frame.unpack("BOGUS\nfoo:bar\n\nbody\x00\n").unwrap_err();
        assert!(matches!(err, StompError::Frame(_)));
        assert_eq!(frame, before);
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let packed = message_frame().pack().unwrap();

        let mut frame2 = Frame::new(Dialect::V1_1);
        frame2.unpack(&packed).unwrap();

        assert_eq!(frame2.command(), Some(Command::Message));
        assert_eq!(frame2.headers["destination"], "/queue/a");
        assert_eq!(frame2.headers["message-id"], "card_data");
        assert_eq!(&frame2.body[..], b"hello queue a");
        assert_eq!(frame2.pack().unwrap(), packed);
    }

    #[test]
    fn test_pack_unpack_keeps_trailing_spaces() {
        let mut frame = Frame::with_command(Dialect::V1_0, "SEND").unwrap();
        frame.set_body("  A ");

        let mut back = Frame::new(Dialect::V1_0);
        back.unpack(&frame.pack().unwrap()).unwrap();
        assert_eq!(&back.body[..], b"A ");

        // Without the terminator the trailing spaces are trimmed.
        assert_eq!(unpack_frame("SEND\n\n  A ").body_text(), "A");
    }

    #[test]
    fn test_unpack_frame_without_terminator() {
        let msg = "MESSAGE\ndestination:/queue/a\nmessage-id:card_data\n\nhello queue a";
        let result = unpack_frame(msg);

        assert_eq!(result.cmd, "MESSAGE");
        assert_eq!(result.header("destination"), Some("/queue/a"));
        assert_eq!(result.header("message-id"), Some("card_data"));
        assert_eq!(result.body_text(), "hello queue a");
    }

    #[test]
    fn test_unpack_frame_connected_no_body() {
        let msg = "CONNECTED\nversion:1.1\nsession:ID:snorky.local-49191-1185461799654-3:18\n";
        let result = unpack_frame(msg);

        assert_eq!(result.cmd, "CONNECTED");
        assert_eq!(
            result.header("session"),
            Some("ID:snorky.local-49191-1185461799654-3:18")
        );
        assert!(result.body.is_empty());
    }

    #[test]
    fn test_unpack_frame_strips_trailing_blank_and_nul() {
        let msg = "MESSAGE\ndestination:/queue/a\nmessage-id:card_data\n\nhello queue a\n\n\x00\n";
        let result = unpack_frame(msg);
        assert_eq!(result.body_text(), "hello queue a");
    }

    #[test]
    fn test_unpack_frame_body_lines_joined() {
        let result = unpack_frame("SEND\n\n  line one \nline two\n\x00\n");
        assert_eq!(result.body_text(), "line oneline two");
    }

    #[test]
    fn test_unpack_frame_duplicate_header_last_wins() {
        let result = unpack_frame("MESSAGE\nfoo:1\nfoo:2\n\n\x00\n");
        assert_eq!(result.header("foo"), Some("2"));
    }

    #[test]
    fn test_unpack_frame_never_fails() {
        assert_eq!(unpack_frame(""), ParsedFrame::default());
        let result = unpack_frame("\n\n\n");
        assert_eq!(result.cmd, "");
        assert!(result.headers.is_empty());
        let result = unpack_frame("JUNK\nnot a header\n");
        assert_eq!(result.cmd, "JUNK");
        assert!(result.headers.is_empty());
    }

    #[test]
    fn test_unpack_frame_header_lookalike_in_body_position() {
        // No blank line yet, so this is read as a header.
        let result = unpack_frame("SEND\nkey:value");
        assert_eq!(result.header("key"), Some("value"));
        assert!(result.body.is_empty());
    }

    #[test]
    fn test_require_header() {
        let parsed = message_frame().to_parsed();
        assert_eq!(parsed.require_header("message-id").unwrap(), "card_data");
        let err = parsed.require_header("subscription").unwrap_err();
        assert!(matches!(err, StompError::MissingHeader(ref h) if h == "subscription"));
    }

    fn header_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,11}"
    }

    fn header_value() -> impl Strategy<Value = String> {
        "[A-Za-z0-9/_.-]{0,16}"
    }

    proptest! {
        #[test]
        fn prop_pack_unpack_roundtrip(
            cmd in prop::sample::select(Dialect::V1_1.valid_commands().to_vec()),
            headers in prop::collection::btree_map(header_name(), header_value(), 0..6),
            body in "[A-Za-z0-9 .,!?]{0,64}",
        ) {
            let mut frame = Frame::with_command(Dialect::V1_1, cmd.as_str()).unwrap();
            frame.headers = headers.clone();
            frame.set_body(body.clone());

            let packed = frame.pack().unwrap();
            let mut back = Frame::new(Dialect::V1_1);
            back.unpack(&packed).unwrap();

            prop_assert_eq!(back.command(), Some(cmd));
            prop_assert_eq!(back.headers, headers);
            // The last body line ends in the NUL, so only leading
            // whitespace is trimmed from it.
            prop_assert_eq!(String::from_utf8_lossy(&back.body), body.trim_start());
        }
    }
}
