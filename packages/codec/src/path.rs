//! Field paths
//!
//! A path is an ordered list of map keys and sequence indices. Two textual
//! notations are accepted and considered equivalent:
//!
//! - dotted with brackets: `servers[0].host`
//! - all dotted: `servers.0.host`
//!
//! Comparison, hashing and lookups always go through the all-dotted
//! normalized form, so `Segment::Key("0")` equals `Segment::Index(0)`.

use crate::error::PathError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    pub fn key(key: impl Into<String>) -> Self {
        Segment::Key(key.into())
    }

    /// Index value, also for keys spelled as a canonical number
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(index) => Some(*index),
            Segment::Key(key) => canonical_index(key),
        }
    }

    /// The segment as a map key
    pub fn to_key(&self) -> String {
        self.normalized().into_owned()
    }

    pub fn normalized(&self) -> Cow<'_, str> {
        match self {
            Segment::Key(key) => Cow::Borrowed(key),
            Segment::Index(index) => Cow::Owned(index.to_string()),
        }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Segment::Index(a), Segment::Index(b)) => a == b,
            _ => self.normalized() == other.normalized(),
        }
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// Location of a value inside a document tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path (document root)
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Parse dotted (`a.b.0`) or bracketed (`a.b[0]`) notation
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let mut segments = Vec::new();
        if path.is_empty() {
            return Ok(Self { segments });
        }

        let chars: Vec<char> = path.chars().collect();
        let mut pos = 0;
        let mut current = String::new();
        // A segment is required at the start and after every '.'
        let mut expect_segment = true;

        while pos < chars.len() {
            match chars[pos] {
                '.' => {
                    if expect_segment {
                        return Err(PathError::EmptySegment {
                            path: path.to_string(),
                            position: pos,
                        });
                    }
                    flush_key(&mut current, &mut segments);
                    expect_segment = true;
                    pos += 1;
                }
                '[' => {
                    // `[` directly after a '.' (as in `a.[0]`) leaves an empty key
                    if expect_segment && pos > 0 {
                        return Err(PathError::EmptySegment {
                            path: path.to_string(),
                            position: pos,
                        });
                    }
                    flush_key(&mut current, &mut segments);
                    let close = chars[pos..]
                        .iter()
                        .position(|c| *c == ']')
                        .map(|offset| pos + offset)
                        .ok_or_else(|| PathError::UnclosedBracket {
                            path: path.to_string(),
                        })?;
                    let raw: String = chars[pos + 1..close].iter().collect();
                    let index = raw.parse::<usize>().map_err(|_| PathError::InvalidIndex {
                        path: path.to_string(),
                        index: raw.clone(),
                    })?;
                    segments.push(Segment::Index(index));
                    expect_segment = false;
                    pos = close + 1;
                }
                ch => {
                    current.push(ch);
                    expect_segment = false;
                    pos += 1;
                }
            }
        }

        if expect_segment {
            return Err(PathError::EmptySegment {
                path: path.to_string(),
                position: chars.len(),
            });
        }
        flush_key(&mut current, &mut segments);

        Ok(Self { segments })
    }

    /// Build from a JSON pointer (`/servers/0/host`)
    pub fn from_pointer(pointer: &str) -> Self {
        let segments = pointer
            .split('/')
            .skip(1)
            .map(|raw| raw.replace("~1", "/").replace("~0", "~"))
            .map(|key| match canonical_index(&key) {
                Some(index) => Segment::Index(index),
                None => Segment::Key(key),
            })
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// A new path with one more segment
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut next = self.clone();
        next.push(segment);
        next
    }

    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        prefix.len() <= self.len()
            && self.segments[..prefix.len()]
                .iter()
                .zip(prefix.segments())
                .all(|(a, b)| a == b)
    }

    /// All-dotted form used for comparisons and map keys
    pub fn normalized(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.normalized())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// JSON pointer form (`/servers/0/host`)
    pub fn to_pointer(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("/{}", s.normalized().replace('~', "~0").replace('/', "~1")))
            .collect()
    }
}

fn flush_key(current: &mut String, segments: &mut Vec<Segment>) {
    if current.is_empty() {
        return;
    }
    let key = std::mem::take(current);
    match canonical_index(&key) {
        Some(index) => segments.push(Segment::Index(index)),
        None => segments.push(Segment::Key(key)),
    }
}

/// `"0"`, `"12"` but not `"012"` or `"+1"`
fn canonical_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Index(index) => write!(f, "[{}]", index)?,
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq<str> for FieldPath {
    fn eq(&self, other: &str) -> bool {
        FieldPath::parse(other).map_or(false, |path| &path == self)
    }
}

impl PartialEq<&str> for FieldPath {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FieldPath::parse(&raw).map_err(serde::de::Error::custom)
    }
}
