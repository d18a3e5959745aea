//! Stream buffer for reassembling frames from arbitrary byte fragments.
//!
//! Uses `bytes::BytesMut` so extracted bodies are frozen slices of the
//! receive buffer rather than copies.
//!
//! Frame boundaries are found lazily on extraction:
//! - With a `content-length` header the frame spans
//!   `header + 2 + content_length + 2` bytes and the body may contain any
//!   byte, including `\x00\n`.
//! - Without one the frame ends at the first `\x00\n` in the buffer.
//!
//! Before each boundary search the buffer is resynchronised: if its first
//! line is not a valid command, bytes are dropped up to the next likely frame
//! boundary. A binary body containing `\x00\n` can produce a false boundary;
//! that is a known limitation of the heuristic. A lone `\n` heart-beat from
//! a 1.1 broker also reads as a corrupt first line and costs the next frame,
//! so transports that negotiate heart-beats must filter them out before
//! [`StreamBuffer::append_data`].
//!
//! A `content-length` above the buffer's cap (see
//! [`StreamBuffer::with_max_content_length`]), or one whose frame size would
//! overflow, is ignored and the frame falls back to terminator scanning.
//!
//! # Example
//!
//! ```
//! use stompwire::protocol::{Dialect, StreamBuffer};
//!
//! let mut buffer = StreamBuffer::new(Dialect::V1_0);
//!
//! buffer.append_data(b"MESSAGE\nmessage-id:1\n\nhel");
//! assert!(buffer.get_one_message().is_none());
//!
//! buffer.append_data(b"lo\x00\n");
//! let frame = buffer.get_one_message().unwrap();
//! assert_eq!(frame.cmd, "MESSAGE");
//! assert_eq!(&frame.body[..], b"hello");
//! ```

use bytes::BytesMut;

use super::command::Dialect;
use super::frame::{Headers, ParsedFrame};
use super::wire_format::{
    content_length, find, split_header_line, DEFAULT_MAX_CONTENT_LENGTH, HEADER_SEPARATOR,
    TERMINATOR,
};

/// Default initial capacity of the receive buffer.
pub const DEFAULT_CAPACITY: usize = 8 * 1024;

/// Byte extent of the oldest complete frame in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameExtent {
    /// Total frame length including the terminator.
    pub total: usize,
    /// Header section length, up to but excluding the `\n\n` separator.
    pub header: usize,
}

/// Buffer for accumulating incoming bytes and extracting complete frames.
///
/// One instance per connection; not meant to be shared between callers.
/// Frames come out in the order their bytes went in.
#[derive(Debug)]
pub struct StreamBuffer {
    /// Unconsumed bytes.
    pending: BytesMut,
    /// Dialect whose command set decides whether the buffer is in sync.
    dialect: Dialect,
    /// Largest declared body length honoured for length framing.
    max_content_length: usize,
}

impl StreamBuffer {
    /// Create a new buffer with the default capacity.
    pub fn new(dialect: Dialect) -> Self {
        Self::with_capacity(dialect, DEFAULT_CAPACITY)
    }

    /// Create a new buffer with a custom initial capacity.
    pub fn with_capacity(dialect: Dialect, capacity: usize) -> Self {
        Self::with_capacity_and_max_content_length(dialect, capacity, DEFAULT_MAX_CONTENT_LENGTH)
    }

    /// Create a new buffer with a custom `content-length` cap.
    pub fn with_max_content_length(dialect: Dialect, max_content_length: usize) -> Self {
        Self::with_capacity_and_max_content_length(dialect, DEFAULT_CAPACITY, max_content_length)
    }

    /// Create a new buffer with custom capacity and `content-length` cap.
    pub fn with_capacity_and_max_content_length(
        dialect: Dialect,
        capacity: usize,
        max_content_length: usize,
    ) -> Self {
        Self {
            pending: BytesMut::with_capacity(capacity),
            dialect,
            max_content_length,
        }
    }

    /// The dialect this buffer validates commands against.
    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Append raw bytes from the transport. No parsing happens here.
    pub fn append_data(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
    }

    /// Largest declared body length honoured for length framing.
    #[inline]
    pub fn max_content_length(&self) -> usize {
        self.max_content_length
    }

    /// Number of buffered bytes.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.pending.len()
    }

    /// Check if the buffer is empty.
    #[inline]
    pub fn buffer_is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Buffered bytes, oldest first.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pending
    }

    /// Drop everything buffered.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Append data and extract every complete frame now available.
    pub fn push(&mut self, data: &[u8]) -> Vec<ParsedFrame> {
        self.append_data(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.get_one_message() {
            frames.push(frame);
        }
        frames
    }

    /// Remove and return the oldest complete frame.
    ///
    /// Returns `None` if no complete frame is buffered yet. Several frames
    /// may already be buffered, so call this in a loop until it returns
    /// `None`.
    pub fn get_one_message(&mut self) -> Option<ParsedFrame> {
        let extent = self.find_message_bytes()?;

        let mut msg = self.pending.split_to(extent.total);
        // A terminator-delimited frame can end before the first blank line.
        let header_len = extent.header.min(extent.total - TERMINATOR.len());

        let mut lines = msg[..header_len].split(|&b| b == b'\n');
        let cmd = lines
            .next()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .unwrap_or_default();
        let headers: Headers = lines.filter_map(split_header_line).collect();

        let body_start = (header_len + HEADER_SEPARATOR.len()).min(extent.total - TERMINATOR.len());
        let _ = msg.split_to(body_start);
        msg.truncate(msg.len() - TERMINATOR.len());

        tracing::trace!(cmd = %cmd, len = extent.total, "extracted frame");

        Some(ParsedFrame {
            cmd,
            headers,
            body: msg.freeze(),
        })
    }

    /// Locate the oldest complete frame.
    ///
    /// Resynchronises first. Returns `None` until the whole header section
    /// (through `\n\n`) and, where declared, the whole body are buffered.
    pub(crate) fn find_message_bytes(&mut self) -> Option<FrameExtent> {
        self.sync_buffer();

        let header = find(&self.pending, HEADER_SEPARATOR)?;

        // Only the header section is searched, so body text can never
        // masquerade as a length declaration.
        let declared = content_length(&self.pending[..header])
            .and_then(|len| self.length_framed_total(header, len));

        match declared {
            Some(total) => {
                if self.pending.len() < total {
                    return None;
                }
                Some(FrameExtent { total, header })
            }
            None => {
                let end = find(&self.pending, TERMINATOR)?;
                Some(FrameExtent {
                    total: end + TERMINATOR.len(),
                    header,
                })
            }
        }
    }

    /// Total frame size for a declared body length, or `None` if the
    /// declaration exceeds the cap or the size does not fit in `usize`.
    fn length_framed_total(&self, header: usize, len: usize) -> Option<usize> {
        if len > self.max_content_length {
            tracing::warn!(
                len,
                max = self.max_content_length,
                "content-length exceeds maximum, scanning for terminator"
            );
            return None;
        }
        let total = header
            .checked_add(HEADER_SEPARATOR.len())
            .and_then(|n| n.checked_add(len))
            .and_then(|n| n.checked_add(TERMINATOR.len()));
        if total.is_none() {
            tracing::warn!(len, "content-length overflows frame size, scanning for terminator");
        }
        total
    }

    /// Detect and drop corrupt leading bytes.
    ///
    /// The buffer is corrupt when it holds at least one newline and the text
    /// before the first newline is not a valid command. Corrupt bytes are
    /// dropped up to and including the first `\x00\n`, and the check
    /// repeats. With no `\x00\n` anywhere the whole buffer is discarded.
    /// A buffer without a newline is left alone: a partial first line cannot
    /// be judged yet.
    ///
    /// Calling this twice in a row has the same effect as calling it once.
    pub fn sync_buffer(&mut self) {
        loop {
            if self.pending.is_empty() {
                break;
            }

            let Some(eol) = self.pending.iter().position(|&b| b == b'\n') else {
                break;
            };

            let candidate = std::str::from_utf8(&self.pending[..eol]).unwrap_or("");
            if self.dialect.is_valid_command(candidate) {
                break;
            }

            match find(&self.pending, TERMINATOR) {
                Some(pos) => {
                    let dropped = pos + TERMINATOR.len();
                    tracing::debug!(dropped, "resync: discarding bytes up to frame terminator");
                    let _ = self.pending.split_to(dropped);
                }
                None => {
                    tracing::warn!(
                        dropped = self.pending.len(),
                        "resync: no frame boundary found, discarding buffer"
                    );
                    self.pending.clear();
                    break;
                }
            }
        }
    }
}
