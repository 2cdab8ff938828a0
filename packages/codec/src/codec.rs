//! Parse and serialize the value tree in either format

use crate::error::{ParseError, ParseResult, SerializeError};
use crate::format::Format;
use serde_json::Value;
use tracing::debug;

/// Parse `text` into a value tree
///
/// Only the earliest error is reported. Structured text holding nothing but
/// whitespace and comments parses to `null`.
pub fn parse(text: &str, format: Format) -> ParseResult<Value> {
    let result = match format {
        Format::Structured => parse_structured(text),
        Format::Flow => parse_flow(text),
    };
    if let Err(err) = &result {
        debug!(%format, line = err.line, column = err.column, message = %err.message, "Parse failed");
    }
    result
}

/// Serialize a value tree
///
/// Structured output uses explicit `null` markers and never wraps lines; flow
/// output is indented with two spaces. Both end with a newline.
pub fn serialize(tree: &Value, format: Format) -> Result<String, SerializeError> {
    match format {
        Format::Structured => Ok(serde_yaml::to_string(tree)?),
        Format::Flow => {
            let mut out = serde_json::to_string_pretty(tree)?;
            out.push('\n');
            Ok(out)
        }
    }
}

fn parse_structured(text: &str) -> ParseResult<Value> {
    if is_blank_document(text) {
        return Ok(Value::Null);
    }

    serde_yaml::from_str::<Value>(text).map_err(|err| {
        let message = strip_location(&err.to_string());
        match err.location() {
            Some(location) => {
                ParseError::at_line_col(text, location.line(), location.column(), message)
            }
            None => ParseError::at_offset(text, text.chars().count(), message),
        }
    })
}

fn parse_flow(text: &str) -> ParseResult<Value> {
    serde_json::from_str::<Value>(text).map_err(|err| {
        let message = strip_location(&err.to_string());
        ParseError::at_offset(text, byte_position_to_offset(text, err.line(), err.column()), message)
    })
}

/// Character offset of a 1-indexed line and byte column
///
/// serde_json counts columns in bytes, and reports column 0 for errors at the
/// very start of a line. Columns past the line end clamp to its newline.
fn byte_position_to_offset(text: &str, line: usize, byte_column: usize) -> usize {
    let line_start = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |end| line_start + end);

    let mut byte = (line_start + byte_column.saturating_sub(1)).min(line_end);
    while !text.is_char_boundary(byte) {
        byte -= 1;
    }
    text[..byte].chars().count()
}

fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---"
    })
}

/// Drop the backend's " at line X column Y" suffix; positions live on the error
fn strip_location(message: &str) -> String {
    match message.find(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message.to_string(),
    }
}
