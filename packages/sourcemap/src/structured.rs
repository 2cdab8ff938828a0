//! Line scanner for the indentation-significant format
//!
//! Keeps a stack of open frames, one per key or list item, each remembering
//! the column it started at. A key at column `c` closes every frame at `c` or
//! deeper; a list marker at column `c` closes deeper frames and sibling items
//! at `c`. The frame left on top owns the list and hands out its item indices,
//! so counters reset whenever their owner is unwound. Both list styles are
//! understood:
//!
//! ```text
//! items:          items:
//!   - first       - first
//!   - second      - second
//! ```

use crate::mapping::{is_addressable, pick_anchor, Anchor};
use formsync_codec::{FieldPath, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Key,
    Item,
}

#[derive(Debug)]
struct Frame {
    indent: usize,
    segment: Segment,
    kind: FrameKind,
    next_item: usize,
    anchor: Option<usize>,
}

/// What one line contributed to the scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineRole {
    /// Blank, comment or document marker
    Skipped,
    /// Opened paths on this line, shallowest first
    Anchored(Vec<usize>),
    /// Part of the value owned by the innermost open frame
    Continuation,
}

#[derive(Debug, Default)]
pub(crate) struct StructuredScanner {
    stack: Vec<Frame>,
    anchors: Vec<Anchor>,
    root_items: usize,
    /// Column of the line that opened a `|` / `>` block scalar
    block_indent: Option<usize>,
    last_content: (usize, usize),
}

impl StructuredScanner {
    pub fn scan_line(&mut self, line_no: usize, raw: &str) -> LineRole {
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        let indent = text.len() - text.trim_start_matches(' ').len();
        let body = text[indent..].trim_end();

        if body.is_empty() {
            return LineRole::Skipped;
        }
        if let Some(block) = self.block_indent {
            if indent > block {
                self.touch(line_no, text);
                return LineRole::Continuation;
            }
            self.block_indent = None;
        }
        if body.starts_with('#') || (indent == 0 && is_document_marker(body)) {
            return LineRole::Skipped;
        }

        let mut opened = Vec::new();
        let mut column = indent;
        let mut rest = body;
        let mut is_list_line = false;

        while rest == "-" || rest.starts_with("- ") {
            is_list_line = true;
            if let Some(id) = self.open_item(column, line_no) {
                opened.push(id);
            }
            let after = &rest[1..];
            let spaces = after.len() - after.trim_start_matches(' ').len();
            column += 1 + spaces;
            rest = &after[spaces..];
        }

        if !rest.is_empty() && !rest.starts_with('#') {
            if let Some((key, value)) = split_key(rest) {
                if let Some(id) = self.open_key(column, key, line_no) {
                    opened.push(id);
                }
                if starts_block_scalar(value) {
                    self.block_indent = Some(column);
                }
            } else if is_list_line {
                if starts_block_scalar(rest) {
                    self.block_indent = Some(column.saturating_sub(2));
                }
            } else {
                self.touch(line_no, text);
                return LineRole::Continuation;
            }
        }

        self.touch(line_no, text);
        LineRole::Anchored(opened)
    }

    /// Path of the innermost open frame
    pub fn current_path(&self) -> Option<FieldPath> {
        let path = self.path();
        is_addressable(&path).then_some(path)
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Close every open frame and return the anchors in document order
    pub fn finish(mut self) -> Vec<Anchor> {
        while !self.stack.is_empty() {
            self.pop();
        }
        self.anchors
    }

    fn path(&self) -> FieldPath {
        FieldPath::from_segments(self.stack.iter().map(|frame| frame.segment.clone()))
    }

    fn open_item(&mut self, column: usize, line_no: usize) -> Option<usize> {
        while let Some(top) = self.stack.last() {
            if top.indent > column || (top.indent == column && top.kind == FrameKind::Item) {
                self.pop();
            } else {
                break;
            }
        }

        let index = match self.stack.last_mut() {
            Some(owner) => {
                owner.next_item += 1;
                owner.next_item - 1
            }
            None => {
                self.root_items += 1;
                self.root_items - 1
            }
        };

        self.push(column, Segment::Index(index), FrameKind::Item, line_no)
    }

    fn open_key(&mut self, column: usize, key: String, line_no: usize) -> Option<usize> {
        while self.stack.last().is_some_and(|top| top.indent >= column) {
            self.pop();
        }
        self.push(column, Segment::Key(key), FrameKind::Key, line_no)
    }

    fn push(&mut self, indent: usize, segment: Segment, kind: FrameKind, line_no: usize) -> Option<usize> {
        self.stack.push(Frame {
            indent,
            segment,
            kind,
            next_item: 0,
            anchor: None,
        });

        let path = self.path();
        if !is_addressable(&path) {
            return None;
        }
        let id = self.anchors.len();
        self.anchors.push(Anchor::new(path, line_no, indent + 1));
        if let Some(frame) = self.stack.last_mut() {
            frame.anchor = Some(id);
        }
        Some(id)
    }

    fn pop(&mut self) {
        if let Some(frame) = self.stack.pop() {
            if let Some(id) = frame.anchor {
                self.anchors[id].end = Some(self.last_content);
            }
        }
    }

    fn touch(&mut self, line_no: usize, text: &str) {
        self.last_content = (line_no, text.trim_end().chars().count() + 1);
    }
}

/// All anchors of a document
pub(crate) fn scan(text: &str) -> Vec<Anchor> {
    let mut scanner = StructuredScanner::default();
    for (index, line) in text.split('\n').enumerate() {
        scanner.scan_line(index + 1, line);
    }
    scanner.finish()
}

/// Path at a cursor, from a scan truncated after `line`
pub(crate) fn resolve(text: &str, line: usize, column: usize) -> Option<FieldPath> {
    let mut scanner = StructuredScanner::default();
    for (index, raw) in text.split('\n').enumerate().take(line) {
        let role = scanner.scan_line(index + 1, raw);
        if index + 1 == line {
            return match role {
                LineRole::Skipped => None,
                LineRole::Anchored(ids) => pick_anchor(scanner.anchors(), &ids, column),
                LineRole::Continuation => scanner.current_path(),
            };
        }
    }
    None
}

fn is_document_marker(body: &str) -> bool {
    ["---", "..."].iter().any(|marker| {
        body.strip_prefix(marker)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
    })
}

fn starts_block_scalar(value: &str) -> bool {
    value.starts_with('|') || value.starts_with('>')
}

/// Split `key: value` (plain, single- or double-quoted key)
fn split_key(text: &str) -> Option<(String, &str)> {
    match text.chars().next()? {
        '"' => {
            let close = closing_double_quote(text)?;
            let key = serde_json::from_str::<String>(&text[..=close])
                .unwrap_or_else(|_| text[1..close].to_string());
            after_colon(&text[close + 1..]).map(|value| (key, value))
        }
        '\'' => {
            let close = closing_single_quote(text)?;
            let key = text[1..close].replace("''", "'");
            after_colon(&text[close + 1..]).map(|value| (key, value))
        }
        '{' | '[' | '?' | '|' | '>' | '&' | '*' | '!' | '%' | '@' | '`' => None,
        _ => {
            let colon = text
                .match_indices(':')
                .map(|(i, _)| i)
                .find(|&i| text[i + 1..].is_empty() || text[i + 1..].starts_with(' '))?;
            let key = text[..colon].trim_end();
            if key.contains(" #") {
                return None;
            }
            Some((key.to_string(), text[colon + 1..].trim_start()))
        }
    }
}

fn after_colon(rest: &str) -> Option<&str> {
    let rest = rest.trim_start_matches(' ');
    let value = rest.strip_prefix(':')?;
    (value.is_empty() || value.starts_with(' ')).then(|| value.trim_start())
}

fn closing_double_quote(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, ch) in text.char_indices().skip(1) {
        match ch {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(i),
            _ => escaped = false,
        }
    }
    None
}

fn closing_single_quote(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}
