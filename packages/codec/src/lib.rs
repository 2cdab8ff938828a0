//! # formsync codec
//!
//! Value tree <-> text conversion for the two document formats, plus the
//! path type every other crate addresses the tree with.
//!
//! ```text
//! structured (YAML) ──┐                 ┌── structured (YAML)
//!                     ├─ parse → Value ─┤
//! flow (JSON) ────────┘   serialize ←   └── flow (JSON)
//! ```

pub mod codec;
pub mod error;
pub mod format;
pub mod path;
pub mod position;
pub mod value;

#[cfg(feature = "pretty-errors")]
pub mod pretty;

pub use codec::{parse, serialize};
pub use error::{ParseError, ParseResult, PathError, SerializeError};
pub use format::Format;
pub use path::{FieldPath, Segment};
pub use position::{line_col_to_offset, line_text, offset_to_line_col};
pub use value::{value_at, with_value_at, without_value_at};

/// The value tree shared by the form and the text views.
pub use serde_json::Value;
