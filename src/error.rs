use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Access,
    Convert,
}

/// Error raised by parsing, node access, or scalar conversion.
///
/// Parse errors carry the line number of the offending input line; the
/// message already embeds a copy of that line.
#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub line: Option<u32>,
}

/// How much of the offending line is copied into a parse error message.
const LINE_COPY_LIMIT: usize = 128;

impl Error {
    pub fn access(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Access,
            message: message.into(),
            line: None,
        }
    }

    pub fn convert(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Convert,
            message: message.into(),
            line: None,
        }
    }

    /// Build a parse error, appending the line number and a copy of the
    /// offending line (truncated to 128 bytes).
    pub(crate) fn parse(line: u32, line_text: &[u8], message: impl fmt::Display) -> Self {
        let end = line_text
            .iter()
            .position(|&b| b == b'\n' || b == b'\r')
            .unwrap_or(line_text.len());
        let snippet = String::from_utf8_lossy(&line_text[..end.min(LINE_COPY_LIMIT)]);
        let ellipsis = if end > LINE_COPY_LIMIT { "..." } else { "" };
        Self {
            kind: ErrorKind::Parse,
            message: format!("Parse error: {message}\n  In line {line}: \"{snippet}{ellipsis}\""),
            line: Some(line),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_parse_error_embeds_line() {
        let err = Error::parse(3, b"key: value\nrest", "bad things");
        assert_eq!(err.line, Some(3));
        assert!(err.message.contains("Parse error: bad things"));
        assert!(err.message.contains("In line 3: \"key: value\""));
        assert!(!err.message.contains("rest"));
    }

    #[rstest::rstest]
    fn test_parse_error_truncates_long_lines() {
        let long = vec![b'x'; 300];
        let err = Error::parse(1, &long, "overflow");
        assert!(err.message.contains("..."));
        assert!(err.message.len() < 300);
    }
}
