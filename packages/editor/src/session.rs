//! # Edit Session
//!
//! One open document: the [`SyncEngine`] plus the [`FocusController`] that
//! follows it. Every change to the text is forwarded to the focus
//! controller, so focus never points at a line that moved or a path that
//! vanished.

use crate::document::{EditOutcome, SyncEngine};
use crate::edits::Edit;
use crate::errors::EditorError;
use crate::focus::{FocusController, FocusOptions};
use crate::timers::Clock;
use crate::ui::UiLayer;
use formsync_codec::{FieldPath, Format, Value};
use formsync_schema::{SchemaDocument, ValidationError, Validator};
use std::rc::Rc;
use std::sync::Arc;

pub struct EditSession<U: UiLayer> {
    engine: SyncEngine,
    focus: FocusController<U>,
}

impl<U: UiLayer> EditSession<U> {
    /// Wrap `engine`; both sides run on `clock`
    pub fn new(engine: SyncEngine, ui: U, focus_options: FocusOptions, clock: Rc<dyn Clock>) -> Self {
        let focus = FocusController::new(engine.content(), engine.format(), ui, clock)
            .with_options(focus_options);
        Self { engine, focus }
    }

    pub fn apply(&mut self, edit: Edit) -> Result<EditOutcome, EditorError> {
        self.ensure_open()?;
        let outcome = match edit {
            Edit::SetValue { path, value } => {
                self.engine.update_from_form(&path, value)?;
                EditOutcome::Synced
            }
            Edit::RemoveValue { path } => {
                self.engine.remove_from_form(&path)?;
                EditOutcome::Synced
            }
            Edit::ReplaceText { text } => self.engine.update_from_editor(text),
            Edit::ChangeFormat { format } => {
                self.engine.change_format(format)?;
                EditOutcome::Synced
            }
            Edit::Reset => {
                self.engine.reset();
                EditOutcome::Synced
            }
        };
        self.sync_focus();
        Ok(outcome)
    }

    pub fn set_value(&mut self, path: &FieldPath, value: Value) -> Result<(), EditorError> {
        self.apply(Edit::SetValue {
            path: path.clone(),
            value,
        })
        .map(|_| ())
    }

    pub fn replace_text(&mut self, text: impl Into<String>) -> Result<EditOutcome, EditorError> {
        self.apply(Edit::ReplaceText { text: text.into() })
    }

    pub fn change_format(&mut self, format: Format) -> Result<(), EditorError> {
        self.apply(Edit::ChangeFormat { format }).map(|_| ())
    }

    pub fn focus_from_form(&mut self, path: FieldPath) {
        self.focus.set_focus_from_form(path);
    }

    pub fn focus_from_editor(&mut self, line: usize, column: usize) {
        self.focus.set_focus_from_editor(line, column);
    }

    /// Drive both timer queues
    pub fn poll(&mut self) {
        self.engine.poll();
        self.focus.poll();
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    /// Validate against `schema` from now on; text changes only go through [`apply`](Self::apply)
    pub fn set_validator(&mut self, schema: Arc<SchemaDocument>, validator: impl Validator + 'static) {
        self.engine.set_validator(schema, validator);
    }

    pub fn validate_now(&mut self) -> &[ValidationError] {
        self.engine.validate_now()
    }

    pub fn focus(&self) -> &FocusController<U> {
        &self.focus
    }

    pub fn clear_focus(&mut self) {
        self.focus.clear();
    }

    pub fn dispose(&mut self) {
        self.focus.dispose();
    }

    fn ensure_open(&self) -> Result<(), EditorError> {
        if self.focus.is_disposed() {
            return Err(EditorError::Disposed);
        }
        Ok(())
    }

    fn sync_focus(&mut self) {
        self.focus
            .update_content(self.engine.content(), self.engine.format());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::ManualClock;
    use crate::ui::HeadlessUi;
    use serde_json::json;

    fn session() -> EditSession<HeadlessUi> {
        let clock = Rc::new(ManualClock::new());
        let engine = SyncEngine::new(
            json!({"name": "test", "config": {"host": "localhost"}}),
            Format::Structured,
            clock.clone(),
        )
        .unwrap();
        let options = FocusOptions {
            debounce_ms: 0,
            ..FocusOptions::default()
        };
        EditSession::new(engine, HeadlessUi, options, clock)
    }

    #[test]
    fn test_focus_follows_format_change() {
        let mut session = session();
        session.focus_from_form(FieldPath::parse("config.host").unwrap());
        assert_eq!(session.focus().focus().unwrap().line, Some(3));

        session.change_format(Format::Flow).unwrap();
        assert_eq!(session.focus().focus().unwrap().line, Some(4));
    }

    #[test]
    fn test_focus_cleared_when_field_removed() {
        let mut session = session();
        session.focus_from_editor(3, 3);
        assert!(session.focus().focus().is_some());

        session
            .apply(Edit::RemoveValue {
                path: FieldPath::parse("config.host").unwrap(),
            })
            .unwrap();
        assert!(session.focus().focus().is_none());
    }

    #[test]
    fn test_parse_failure_is_an_outcome() {
        let mut session = session();
        let outcome = session.replace_text("name: [").unwrap();
        assert!(!outcome.is_synced());
        assert_eq!(session.engine().content(), "name: [");
    }

    #[test]
    fn test_validation_through_session_keeps_focus_current() {
        let mut session = session();
        let schema = Arc::new(SchemaDocument::new(
            "memory://config.json",
            json!({"type": "object", "properties": {"name": {"type": "integer"}}}),
        ));
        session.set_validator(schema, formsync_schema::JsonSchemaValidator::new());
        assert_eq!(session.validate_now().len(), 1);

        session.focus_from_form(FieldPath::parse("config.host").unwrap());
        session.replace_text("config:\n  host: localhost\n").unwrap();
        assert_eq!(session.focus().focus().unwrap().line, Some(2));
        session.clear_focus();
        assert!(session.focus().focus().is_none());
    }

    #[test]
    fn test_disposed_session_rejects_edits() {
        let mut session = session();
        session.dispose();
        assert!(matches!(
            session.replace_text("a: 1"),
            Err(EditorError::Disposed)
        ));
    }
}
