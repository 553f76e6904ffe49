//! Error type for document parsing.
//!
//! [`ParseError`] reports why a document could not be turned into a
//! [`Document`](svg_critic_core::document::Document). Parsing is all or
//! nothing: a malformed document never yields a partial result.

use thiserror::Error;

/// Error returned when markup cannot be parsed.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input is not well-formed XML.
    #[error("malformed markup: {message}")]
    Malformed {
        /// Description from the XML reader, including line and column.
        message: String,
        /// Byte offset into the source where the reader stopped.
        offset: usize,
    },
}

impl ParseError {
    /// Creates a [`ParseError::Malformed`] from a 1-based row and column,
    /// resolving them to a byte offset in `source`.
    pub(crate) fn malformed(message: impl Into<String>, source: &str, row: u32, col: u32) -> Self {
        Self::Malformed {
            message: message.into(),
            offset: byte_offset(source, row, col),
        }
    }

    /// Returns the byte offset of the failure in the source text.
    pub fn offset(&self) -> usize {
        match self {
            Self::Malformed { offset, .. } => *offset,
        }
    }

    /// Returns the reader's description of the failure.
    pub fn message(&self) -> &str {
        match self {
            Self::Malformed { message, .. } => message,
        }
    }
}

/// Converts a 1-based row/column (columns counted in chars) to a byte offset,
/// clamped to the source length.
fn byte_offset(source: &str, row: u32, col: u32) -> usize {
    let row = row.max(1) as usize;
    let col = col.max(1) as usize;

    let line_start: usize = source
        .split_inclusive('\n')
        .take(row - 1)
        .map(str::len)
        .sum();

    let line = &source[line_start..];
    let within = line
        .char_indices()
        .nth(col - 1)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len());

    (line_start + within).min(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_offset_first_line() {
        assert_eq!(byte_offset("<svg>", 1, 1), 0);
        assert_eq!(byte_offset("<svg>", 1, 3), 2);
    }

    #[test]
    fn test_byte_offset_later_line() {
        let source = "<svg>\n  <rect/>\n</svg>";
        assert_eq!(byte_offset(source, 2, 3), 8);
        assert_eq!(&source[8..13], "<rect");
    }

    #[test]
    fn test_byte_offset_clamps_past_end() {
        let source = "<svg>\n";
        assert_eq!(byte_offset(source, 1, 99), 6);
        assert_eq!(byte_offset(source, 9, 1), 6);
    }

    #[test]
    fn test_display() {
        let err = ParseError::malformed("unexpected end of stream", "<svg", 1, 5);
        assert_eq!(err.to_string(), "malformed markup: unexpected end of stream");
        assert_eq!(err.offset(), 4);
        assert_eq!(err.message(), "unexpected end of stream");
    }
}
