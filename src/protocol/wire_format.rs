//! Wire format constants and scanning helpers.
//!
//! Frame layout shared by both dialects:
//! ```text
//! COMMAND\n
//! name:value\n      (zero or more)
//! \n
//! BODY\x00\n
//! ```
//!
//! The body ends either at the first `\x00\n` or, when a `content-length`
//! header is present, after exactly that many bytes.

/// NUL byte that opens the frame terminator.
pub const NULL: u8 = 0x00;

/// Frame terminator: NUL followed by newline.
pub const TERMINATOR: &[u8] = b"\x00\n";

/// Blank line separating headers from body.
pub const HEADER_SEPARATOR: &[u8] = b"\n\n";

/// Header declaring the body length in bytes.
pub const CONTENT_LENGTH: &str = "content-length";

/// Largest `content-length` the stream buffer honours by default (1GB).
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 1_073_741_824;

/// Reply returned by the dispatcher when nothing needs to be sent back.
pub const NO_RESPONSE_NEEDED: &str = "";

/// Find the first occurrence of `needle` in `haystack`.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Split a header line at its first colon and trim both sides.
///
/// Returns `None` for lines without a colon or with an empty name.
/// Values may themselves contain colons (e.g. broker session ids).
pub fn split_header_line(line: &[u8]) -> Option<(String, String)> {
    let colon = line.iter().position(|&b| b == b':')?;
    let name = line[..colon].trim_ascii();
    if name.is_empty() {
        return None;
    }
    let value = line[colon + 1..].trim_ascii();
    Some((
        String::from_utf8_lossy(name).into_owned(),
        String::from_utf8_lossy(value).into_owned(),
    ))
}

/// Scan a header section for a `content-length` declaration.
///
/// `section` is everything before the `\n\n` separator: the command line
/// followed by header lines. The command line is never treated as a header.
/// The name match is case-insensitive; the first header that parses as a
/// decimal length wins. A non-numeric value is ignored.
pub fn content_length(section: &[u8]) -> Option<usize> {
    section
        .split(|&b| b == b'\n')
        .skip(1)
        .filter_map(|line| {
            let colon = line.iter().position(|&b| b == b':')?;
            let name = line[..colon].trim_ascii();
            if !name.eq_ignore_ascii_case(CONTENT_LENGTH.as_bytes()) {
                return None;
            }
            let value = line[colon + 1..].trim_ascii();
            if value.is_empty() || !value.iter().all(u8::is_ascii_digit) {
                return None;
            }
            std::str::from_utf8(value).ok()?.parse::<usize>().ok()
        })
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        assert_eq!(find(b"abc\x00\nxyz", TERMINATOR), Some(3));
        assert_eq!(find(b"abc", TERMINATOR), None);
        assert_eq!(find(b"", TERMINATOR), None);
        assert_eq!(find(b"a\n\nb\n\n", HEADER_SEPARATOR), Some(1));
    }

    #[test]
    fn test_split_header_line_first_colon_wins() {
        let (k, v) = split_header_line(b"session:ID:snorky.local-49191-3:18").unwrap();
        assert_eq!(k, "session");
        assert_eq!(v, "ID:snorky.local-49191-3:18");
    }

    #[test]
    fn test_split_header_line_trims() {
        let (k, v) = split_header_line(b"  destination :  /queue/a  ").unwrap();
        assert_eq!(k, "destination");
        assert_eq!(v, "/queue/a");
    }

    #[test]
    fn test_split_header_line_rejects_malformed() {
        assert!(split_header_line(b"no colon here").is_none());
        assert!(split_header_line(b":orphan value").is_none());
    }

    #[test]
    fn test_content_length_found() {
        let section = b"SEND\ncontent-length:6\ndestination:/queue/a";
        assert_eq!(content_length(section), Some(6));
    }

    #[test]
    fn test_content_length_as_last_header() {
        let section = b"SEND\ndestination:/queue/a\ncontent-length: 12 ";
        assert_eq!(content_length(section), Some(12));
    }

    #[test]
    fn test_content_length_case_insensitive() {
        assert_eq!(content_length(b"MESSAGE\nContent-Length:3"), Some(3));
    }

    #[test]
    fn test_content_length_absent_or_bogus() {
        assert_eq!(content_length(b"SEND\ndestination:/queue/a"), None);
        assert_eq!(content_length(b"SEND\ncontent-length:abc"), None);
        assert_eq!(content_length(b"SEND\ncontent-length:"), None);
    }

    #[test]
    fn test_content_length_ignores_command_line() {
        assert_eq!(content_length(b"content-length:5"), None);
    }
}
