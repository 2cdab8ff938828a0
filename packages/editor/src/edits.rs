//! # Edits
//!
//! Serializable descriptions of everything a user can do to a document, so
//! hosts can queue, log or replay them.
//!
//! ## Semantics
//!
//! ### SetValue / RemoveValue
//! - Come from the form; the text is fully re-serialized
//! - Never blocked by a parse error in the text: the unparsed text is replaced
//!
//! ### ReplaceText
//! - Comes from the code editor; atomic replacement, not a diff
//! - A parse failure is an outcome, not an error
//!
//! ### ChangeFormat
//! - Re-serializes the last good values in the new format

use crate::document::ChangeSource;
use formsync_codec::{FieldPath, Format, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Edit {
    SetValue { path: FieldPath, value: Value },
    RemoveValue { path: FieldPath },
    ReplaceText { text: String },
    ChangeFormat { format: Format },
    Reset,
}

impl Edit {
    /// Which view the edit originates from, if any
    pub fn source(&self) -> Option<ChangeSource> {
        match self {
            Edit::SetValue { .. } | Edit::RemoveValue { .. } => Some(ChangeSource::Form),
            Edit::ReplaceText { .. } => Some(ChangeSource::Editor),
            Edit::ChangeFormat { .. } | Edit::Reset => None,
        }
    }

    /// The field an edit writes to
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Edit::SetValue { path, .. } | Edit::RemoveValue { path } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edit_wire_format() {
        let edit: Edit = serde_json::from_value(json!({
            "type": "setValue",
            "path": "servers[0].port",
            "value": 8080
        }))
        .unwrap();
        assert_eq!(edit.path().unwrap(), "servers.0.port");
        assert_eq!(edit.source(), Some(ChangeSource::Form));

        let edit: Edit = serde_json::from_value(json!({"type": "changeFormat", "format": "json"})).unwrap();
        assert_eq!(edit, Edit::ChangeFormat { format: Format::Flow });
        assert_eq!(serde_json::to_value(Edit::Reset).unwrap(), json!({"type": "reset"}));
    }
}
