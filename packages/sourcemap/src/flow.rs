//! Character scanner for the brace-delimited format
//!
//! Tracks a stack of open containers (one per `{` / `[`) together with the
//! member each container is currently inside. A quoted key at the current
//! depth opens `path.key`; every value started inside an array opens
//! `path[k]`. Closing tokens pop back to the enclosing container, so siblings
//! that follow deep children resolve against the right parent. The scanner is
//! tolerant of half-typed input: unbalanced closers and missing separators
//! never abort the scan.

use crate::mapping::{is_addressable, pick_anchor, Anchor};
use formsync_codec::{FieldPath, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Key,
    Colon,
    Value,
    Separator,
}

#[derive(Debug)]
struct Container {
    kind: ContainerKind,
    member: Option<Segment>,
    member_anchor: Option<usize>,
    next_index: usize,
    expect: Expect,
}

impl Container {
    fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            member: None,
            member_anchor: None,
            next_index: 0,
            expect: match kind {
                ContainerKind::Object => Expect::Key,
                ContainerKind::Array => Expect::Value,
            },
        }
    }
}

#[derive(Debug, Default)]
struct FlowScanner {
    stack: Vec<Container>,
    anchors: Vec<Anchor>,
    last_value_end: (usize, usize),
}

impl FlowScanner {
    /// Scan `text`, stopping once `target` line is complete
    ///
    /// Returns the owner of the target line: the path enclosing its first
    /// non-whitespace character.
    fn run(&mut self, text: &str, target: Option<usize>) -> Option<FieldPath> {
        let chars: Vec<char> = text.chars().collect();
        let mut owner = None;
        let (mut line, mut column) = (1, 1);
        let mut line_started = false;
        let mut i = 0;

        while i < chars.len() {
            if target.is_some_and(|t| line > t) {
                break;
            }

            let ch = chars[i];
            if ch == '\n' {
                line += 1;
                column = 1;
                line_started = false;
                i += 1;
                continue;
            }
            if ch.is_whitespace() {
                column += 1;
                i += 1;
                continue;
            }

            if !line_started {
                line_started = true;
                if target == Some(line) {
                    owner = self.owner_of(ch);
                }
            }

            let consumed = match ch {
                '{' | '[' => {
                    self.value_start(line, column);
                    self.stack.push(Container::new(if ch == '{' {
                        ContainerKind::Object
                    } else {
                        ContainerKind::Array
                    }));
                    1
                }
                '}' | ']' => {
                    self.close(line, column);
                    1
                }
                ':' => {
                    if let Some(top) = self.stack.last_mut() {
                        top.expect = Expect::Value;
                    }
                    1
                }
                ',' => {
                    self.separator();
                    1
                }
                '"' => {
                    let (raw, len) = read_string(&chars[i..]);
                    if self.expects_key(&chars[i + len..]) {
                        self.key(decode_string(&raw), line, column);
                    } else {
                        self.value_start(line, column);
                        self.last_value_end = (line, column + len);
                    }
                    len
                }
                _ => {
                    let len = chars[i..]
                        .iter()
                        .take_while(|c| {
                            !c.is_whitespace()
                                && !matches!(**c, ',' | '{' | '[' | '}' | ']' | ':' | '"')
                        })
                        .count()
                        .max(1);
                    self.value_start(line, column);
                    self.last_value_end = (line, column + len);
                    len
                }
            };

            i += consumed;
            column += consumed;
        }

        owner.filter(is_addressable)
    }

    /// Strings in an object are keys when a key is due or a colon follows
    fn expects_key(&self, after: &[char]) -> bool {
        let followed_by_colon = after.iter().find(|c| !c.is_whitespace()) == Some(&':');
        self.stack.last().is_some_and(|top| {
            top.kind == ContainerKind::Object
                && (followed_by_colon || matches!(top.expect, Expect::Key | Expect::Separator))
        })
    }

    /// Path through the members of the first `depth` containers
    fn path_to(&self, depth: usize) -> FieldPath {
        FieldPath::from_segments(
            self.stack[..depth]
                .iter()
                .map_while(|container| container.member.clone()),
        )
    }

    fn owner_of(&self, first: char) -> Option<FieldPath> {
        let depth = match first {
            '}' | ']' => self.stack.len().saturating_sub(1),
            _ => self.stack.len(),
        };
        Some(self.path_to(depth))
    }

    fn record(&mut self, line: usize, column: usize) -> Option<usize> {
        let path = self.path_to(self.stack.len());
        if !is_addressable(&path) {
            return None;
        }
        self.anchors.push(Anchor::new(path, line, column));
        Some(self.anchors.len() - 1)
    }

    fn key(&mut self, key: String, line: usize, column: usize) {
        self.end_member();
        if let Some(top) = self.stack.last_mut() {
            top.member = Some(Segment::Key(key));
            top.expect = Expect::Colon;
        }
        let anchor = self.record(line, column);
        if let Some(top) = self.stack.last_mut() {
            top.member_anchor = anchor;
        }
    }

    fn value_start(&mut self, line: usize, column: usize) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        match top.kind {
            ContainerKind::Array => {
                top.member = Some(Segment::Index(top.next_index));
                top.next_index += 1;
                top.expect = Expect::Separator;
                self.end_member();
                let anchor = self.record(line, column);
                if let Some(top) = self.stack.last_mut() {
                    top.member_anchor = anchor;
                }
            }
            ContainerKind::Object => top.expect = Expect::Separator,
        }
    }

    fn separator(&mut self) {
        self.end_member();
        if let Some(top) = self.stack.last_mut() {
            top.member = None;
            top.expect = match top.kind {
                ContainerKind::Object => Expect::Key,
                ContainerKind::Array => Expect::Value,
            };
        }
    }

    fn close(&mut self, line: usize, column: usize) {
        self.end_member();
        self.stack.pop();
        self.last_value_end = (line, column + 1);
    }

    /// Close the current member's anchor at the end of the last value seen
    fn end_member(&mut self) {
        let end = self.last_value_end;
        if let Some(id) = self.stack.last_mut().and_then(|top| top.member_anchor.take()) {
            self.anchors[id].end.get_or_insert(end);
        }
    }

    fn finish(mut self) -> Vec<Anchor> {
        while !self.stack.is_empty() {
            self.end_member();
            self.stack.pop();
        }
        self.anchors
    }
}

/// Raw string token starting at an opening quote, and its length in chars
///
/// Unterminated strings end at the line break.
fn read_string(chars: &[char]) -> (String, usize) {
    let mut escaped = false;
    for (i, ch) in chars.iter().enumerate().skip(1) {
        match ch {
            '\n' => return (chars[..i].iter().collect(), i),
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return (chars[..=i].iter().collect(), i + 1),
            _ => escaped = false,
        }
    }
    (chars.iter().collect(), chars.len())
}

fn decode_string(raw: &str) -> String {
    serde_json::from_str::<String>(raw).unwrap_or_else(|_| {
        raw.trim_start_matches('"').trim_end_matches('"').to_string()
    })
}

/// All anchors of a document
pub(crate) fn scan(text: &str) -> Vec<Anchor> {
    let mut scanner = FlowScanner::default();
    scanner.run(text, None);
    scanner.finish()
}

/// Path at a cursor, from a scan truncated after `line`
pub(crate) fn resolve(text: &str, line: usize, column: usize) -> Option<FieldPath> {
    let mut scanner = FlowScanner::default();
    let owner = scanner.run(text, Some(line));
    let ids: Vec<usize> = scanner
        .anchors
        .iter()
        .enumerate()
        .filter(|(_, anchor)| anchor.line == line)
        .map(|(id, _)| id)
        .collect();

    if ids.is_empty() {
        owner
    } else {
        pick_anchor(&scanner.anchors, &ids, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(text: &str) -> Vec<(String, usize, usize)> {
        scan(text)
            .into_iter()
            .map(|a| (a.path.to_string(), a.line, a.column))
            .collect()
    }

    const DOC: &str = r#"{
  "name": "test",
  "config": {
    "host": "localhost",
    "nested": {
      "deep": true
    },
    "port": 8080
  },
  "items": [
    "first",
    {
      "id": 2
    }
  ]
}"#;

    #[test]
    fn test_scan_objects_and_arrays() {
        assert_eq!(
            paths(DOC),
            vec![
                ("name".to_string(), 2, 3),
                ("config".to_string(), 3, 3),
                ("config.host".to_string(), 4, 5),
                ("config.nested".to_string(), 5, 5),
                ("config.nested.deep".to_string(), 6, 7),
                ("config.port".to_string(), 8, 5),
                ("items".to_string(), 10, 3),
                ("items[0]".to_string(), 11, 5),
                ("items[1]".to_string(), 12, 5),
                ("items[1].id".to_string(), 13, 7),
            ]
        );
    }

    #[test]
    fn test_end_positions() {
        let anchors = scan(DOC);
        let config = anchors.iter().find(|a| a.path == "config").unwrap();
        assert_eq!(config.end, Some((9, 4)));
        let host = anchors.iter().find(|a| a.path == "config.host").unwrap();
        assert_eq!(host.end, Some((4, 24)));
        let items = anchors.iter().find(|a| a.path == "items").unwrap();
        assert_eq!(items.end, Some((15, 4)));
    }

    #[test]
    fn test_resolve_lines() {
        assert_eq!(resolve(DOC, 4, 10).unwrap(), "config.host");
        assert_eq!(resolve(DOC, 8, 5).unwrap(), "config.port");
        assert_eq!(resolve(DOC, 11, 6).unwrap(), "items[0]");
        assert_eq!(resolve(DOC, 13, 7).unwrap(), "items[1].id");
    }

    #[test]
    fn test_resolve_closing_lines_belong_to_their_container() {
        assert_eq!(resolve(DOC, 7, 5).unwrap(), "config.nested");
        assert_eq!(resolve(DOC, 9, 3).unwrap(), "config");
        assert_eq!(resolve(DOC, 1, 1), None);
        assert_eq!(resolve(DOC, 16, 1), None);
    }

    #[test]
    fn test_single_line_document() {
        let text = r#"{"a": {"b": 1, "c": [true, null]}}"#;
        assert_eq!(
            paths(text),
            vec![
                ("a".to_string(), 1, 2),
                ("a.b".to_string(), 1, 8),
                ("a.c".to_string(), 1, 16),
                ("a.c[0]".to_string(), 1, 22),
                ("a.c[1]".to_string(), 1, 28),
            ]
        );
        assert_eq!(resolve(text, 1, 10).unwrap(), "a.b");
        assert_eq!(resolve(text, 1, 29).unwrap(), "a.c[1]");
    }

    #[test]
    fn test_escaped_keys_and_strings() {
        let text = "{\n  \"say \\\"hi\\\"\": \"a } ] , b\",\n  \"next\": 1\n}";
        let found = paths(text);
        assert_eq!(found[0].0, "say \"hi\"");
        assert_eq!(found[1], ("next".to_string(), 3, 3));
    }

    #[test]
    fn test_tolerates_half_typed_input() {
        let text = "{\n  \"a\": {\n    \"b\": \n  \"c\": 1";
        let found = paths(text);
        assert!(found.contains(&("a.b".to_string(), 3, 5)));
        assert!(found.contains(&("a.c".to_string(), 4, 3)));
        let text = "}\n]\n{\"x\": 1}";
        assert_eq!(paths(text), vec![("x".to_string(), 3, 2)]);
    }

    #[test]
    fn test_root_array() {
        let text = "[\n  {\"k\": 1},\n  2\n]";
        assert_eq!(
            paths(text),
            vec![
                ("[0]".to_string(), 2, 3),
                ("[0].k".to_string(), 2, 4),
                ("[1]".to_string(), 3, 3),
            ]
        );
    }
}
