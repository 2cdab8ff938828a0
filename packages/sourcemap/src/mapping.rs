use crate::{flow, structured};
use formsync_codec::{FieldPath, Format, Segment};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Where a path's key (or list item) sits in the text
///
/// Lines and columns are 1-indexed. `end_column` is the column just past the
/// value's last character. Mappings are recomputed from the current text on
/// every call and never cached across edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMapping {
    pub path: FieldPath,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
}

/// A path opened by the scanners at a text position
#[derive(Debug, Clone)]
pub(crate) struct Anchor {
    pub path: FieldPath,
    pub line: usize,
    pub column: usize,
    pub end: Option<(usize, usize)>,
}

impl Anchor {
    pub fn new(path: FieldPath, line: usize, column: usize) -> Self {
        Self {
            path,
            line,
            column,
            end: None,
        }
    }
}

impl From<Anchor> for LineMapping {
    fn from(anchor: Anchor) -> Self {
        Self {
            path: anchor.path,
            line: anchor.line,
            column: anchor.column,
            end_line: anchor.end.map(|(line, _)| line),
            end_column: anchor.end.map(|(_, column)| column),
        }
    }
}

/// Paths are addressable only when no segment is an empty key
pub(crate) fn is_addressable(path: &FieldPath) -> bool {
    !path.is_empty()
        && !path
            .segments()
            .iter()
            .any(|segment| matches!(segment, Segment::Key(key) if key.is_empty()))
}

/// Of the anchors opened on one line, the last one starting at or before the
/// cursor column; a cursor left of every anchor picks the first.
pub(crate) fn pick_anchor(anchors: &[Anchor], ids: &[usize], column: usize) -> Option<FieldPath> {
    ids.iter()
        .rev()
        .map(|&id| &anchors[id])
        .find(|anchor| anchor.column <= column)
        .or_else(|| ids.first().map(|&id| &anchors[id]))
        .map(|anchor| anchor.path.clone())
}

fn anchors(text: &str, format: Format) -> Vec<Anchor> {
    match format {
        Format::Structured => structured::scan(text),
        Format::Flow => flow::scan(text),
    }
}

/// Every addressable path in `text`, in document order
pub fn mappings(text: &str, format: Format) -> Vec<LineMapping> {
    anchors(text, format).into_iter().map(LineMapping::from).collect()
}

/// The mapping of the first occurrence of `path`
pub fn mapping_for_path(text: &str, path: &FieldPath, format: Format) -> Option<LineMapping> {
    anchors(text, format)
        .into_iter()
        .find(|anchor| &anchor.path == path)
        .map(LineMapping::from)
}

/// 1-indexed line on which `path` is declared
///
/// Bracketed and dotted index notation are interchangeable. The root path has
/// no line.
pub fn line_for_path(text: &str, path: &FieldPath, format: Format) -> Option<usize> {
    if path.is_empty() {
        return None;
    }
    let line = mapping_for_path(text, path, format).map(|mapping| mapping.line);
    trace!(path = %path, %format, ?line, "Resolved line for path");
    line
}

/// The path under a 1-indexed cursor position
///
/// Runs the same forward scan as [`line_for_path`], truncated at `line`, so
/// the two directions always agree. Blank lines, comments and positions
/// outside every value resolve to `None`.
pub fn path_at_position(text: &str, line: usize, column: usize, format: Format) -> Option<FieldPath> {
    if line == 0 {
        return None;
    }
    let path = match format {
        Format::Structured => structured::resolve(text, line, column),
        Format::Flow => flow::resolve(text, line, column),
    };
    trace!(line, column, %format, path = ?path.as_ref().map(ToString::to_string), "Resolved path at position");
    path
}
