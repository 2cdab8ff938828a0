//! Placing validation and parse errors in the text

use formsync_codec::{Format, ParseError};
use formsync_schema::{Severity, ValidationError};
use formsync_sourcemap::mappings;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Error,
    Warning,
}

impl From<Severity> for AnnotationKind {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => AnnotationKind::Error,
            Severity::Warning => AnnotationKind::Warning,
        }
    }
}

/// A gutter marker; `row` and `column` are 0-indexed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub row: usize,
    pub column: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
}

/// First line of every path declared in `content`, by normalized path
fn line_index(content: &str, format: Format) -> HashMap<String, usize> {
    let mut lines = HashMap::new();
    for mapping in mappings(content, format) {
        lines
            .entry(mapping.path.normalized())
            .or_insert(mapping.line);
    }
    lines
}

/// Copies of `errors` with `line` set from the current text
///
/// Errors whose path is not declared in the text get `line: None`.
pub fn locate_errors(errors: &[ValidationError], content: &str, format: Format) -> Vec<ValidationError> {
    let lines = line_index(content, format);
    errors
        .iter()
        .map(|error| ValidationError {
            line: lines.get(&error.path.normalized()).copied(),
            ..error.clone()
        })
        .collect()
}

/// One annotation per error that maps to a line, in input order
pub fn to_line_annotations(errors: &[ValidationError], content: &str, format: Format) -> Vec<Annotation> {
    let lines = line_index(content, format);
    errors
        .iter()
        .filter_map(|error| {
            let line = lines.get(&error.path.normalized())?;
            Some(Annotation {
                row: line - 1,
                column: error.column.unwrap_or(1).saturating_sub(1),
                text: error.message.clone(),
                kind: error.severity.into(),
            })
        })
        .collect()
}

/// Errors keyed by normalized path; the first error for a path wins
pub fn errors_by_path(errors: &[ValidationError]) -> IndexMap<String, ValidationError> {
    let mut by_path = IndexMap::new();
    for error in errors {
        by_path
            .entry(error.path.normalized())
            .or_insert_with(|| error.clone());
    }
    by_path
}

pub fn parse_error_annotation(error: &ParseError) -> Annotation {
    Annotation {
        row: error.line.saturating_sub(1),
        column: error.column.saturating_sub(1),
        text: error.message.clone(),
        kind: AnnotationKind::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsync_codec::FieldPath;

    const CONTENT: &str = "name: test\nconfig:\n  port: high\n  host: x\n";

    fn error(path: &str, message: &str) -> ValidationError {
        ValidationError::new(FieldPath::parse(path).unwrap(), message, "type")
    }

    #[test]
    fn test_annotation_row_is_zero_indexed() {
        let errors = vec![error("config.port", "expected integer")];
        let annotations = to_line_annotations(&errors, CONTENT, Format::Structured);
        assert_eq!(
            annotations,
            vec![Annotation {
                row: 2,
                column: 0,
                text: "expected integer".to_string(),
                kind: AnnotationKind::Error,
            }]
        );
    }

    #[test]
    fn test_reported_column_is_kept() {
        let errors = vec![error("name", "too short").with_column(7)];
        let annotations = to_line_annotations(&errors, CONTENT, Format::Structured);
        assert_eq!((annotations[0].row, annotations[0].column), (0, 6));
    }

    #[test]
    fn test_unmapped_errors_dropped_from_annotations_only() {
        let errors = vec![error("missing", "required"), error("name", "bad")];
        let annotations = to_line_annotations(&errors, CONTENT, Format::Structured);
        assert_eq!(annotations.len(), 1);
        assert_eq!(errors_by_path(&errors).len(), 2);

        let located = locate_errors(&errors, CONTENT, Format::Structured);
        assert_eq!(located[0].line, None);
        assert_eq!(located[1].line, Some(1));
    }

    #[test]
    fn test_first_error_per_path_wins_but_all_annotate() {
        let errors = vec![
            error("config.port", "first"),
            error("config.port", "second"),
        ];
        let by_path = errors_by_path(&errors);
        assert_eq!(by_path.len(), 1);
        assert_eq!(by_path["config.port"].message, "first");
        assert_eq!(to_line_annotations(&errors, CONTENT, Format::Structured).len(), 2);
    }

    #[test]
    fn test_index_notations_match() {
        let content = "items:\n- a\n- 3\n";
        let errors = vec![error("items.1", "expected string")];
        let located = locate_errors(&errors, content, Format::Structured);
        assert_eq!(located[0].line, Some(3));
        assert!(errors_by_path(&errors).contains_key("items.1"));
    }

    #[test]
    fn test_warning_kind() {
        let errors = vec![error("name", "deprecated").with_severity(Severity::Warning)];
        let annotations = to_line_annotations(&errors, CONTENT, Format::Structured);
        assert_eq!(annotations[0].kind, AnnotationKind::Warning);
    }

    #[test]
    fn test_parse_error_annotation() {
        let err = ParseError::at_line_col("a: 1\nb: [\n", 2, 4, "unclosed");
        let annotation = parse_error_annotation(&err);
        assert_eq!((annotation.row, annotation.column), (1, 3));
        assert_eq!(annotation.text, "unclosed");
    }
}
