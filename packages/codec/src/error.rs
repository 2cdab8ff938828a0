use crate::position::{line_col_to_offset, line_text, offset_to_line_col};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Malformed document text
///
/// Only the earliest error by position is ever reported. `line` and `column`
/// are 1-indexed and always derived from `offset` (a character offset).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} at line {line} column {column}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    /// The offending source line
    pub snippet: String,
}

impl ParseError {
    pub fn at_offset(text: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = offset_to_line_col(text, offset);
        Self {
            message: message.into(),
            line,
            column,
            offset,
            snippet: line_text(text, line).unwrap_or_default().to_string(),
        }
    }

    /// Build from a backend-reported line/column, re-deriving both from the offset
    pub fn at_line_col(
        text: &str,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::at_offset(text, line_col_to_offset(text, line, column), message)
    }
}

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("Structured serialization failed: {0}")]
    Structured(#[from] serde_yaml::Error),

    #[error("Flow serialization failed: {0}")]
    Flow(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Empty segment at {position} in path '{path}'")]
    EmptySegment { path: String, position: usize },

    #[error("Unclosed '[' in path '{path}'")]
    UnclosedBracket { path: String },

    #[error("Invalid index '{index}' in path '{path}'")]
    InvalidIndex { path: String, index: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_position_from_offset() {
        let text = "name: test\nconfig: [\n";
        let err = ParseError::at_offset(text, 13, "bad");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
        assert_eq!(err.snippet, "config: [");
        assert_eq!(err.to_string(), "bad at line 2 column 3");
    }

    #[test]
    fn test_parse_error_from_line_col() {
        let text = "a\nbc\nd";
        let err = ParseError::at_line_col(text, 2, 2, "oops");
        assert_eq!(err.offset, 3);
        assert_eq!((err.line, err.column), (2, 2));
    }
}
