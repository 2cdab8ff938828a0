//! # Sync engine
//!
//! One document, two views. The value tree drives the form; the text drives
//! the code editor. Whichever side changed last wins:
//!
//! ```text
//! form edit ──► with_value_at ──► serialize ──► content
//! text edit ──► content ──► parse ──┬─ ok ──► values ──► validate
//!                                   └─ err ─► keep values, store ParseError
//! ```
//!
//! Between a keystroke and its parse outcome the two may disagree; after a
//! failed parse `values` holds the last good tree while `content` keeps what
//! the user typed.

use crate::diagnostics::{errors_by_path, locate_errors, parse_error_annotation, to_line_annotations, Annotation};
use crate::errors::SyncError;
use crate::timers::{Clock, TimerId, TimerQueue};
use formsync_codec::{
    parse, serialize, with_value_at, without_value_at, FieldPath, Format, ParseError, SerializeError, Value,
};
use formsync_schema::{default_values, FieldNode, SchemaDocument, ValidationError, Validator};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncOptions {
    /// Quiet period after a form edit before validation runs
    pub validation_debounce_ms: u64,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            validation_debounce_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
    Form,
    Editor,
}

/// Result of applying editor text
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The text parsed and the form now shows it
    Synced,
    /// The text did not parse; the form keeps the last good values
    ParseFailed(ParseError),
}

impl EditOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, EditOutcome::Synced)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineTask {
    Validate,
}

struct Snapshot {
    values: Value,
    content: String,
    format: Format,
}

struct Validation {
    schema: Arc<SchemaDocument>,
    validator: Box<dyn Validator>,
}

/// Keeps a value tree and its text serialization in step
pub struct SyncEngine {
    options: SyncOptions,
    values: Value,
    content: String,
    format: Format,
    last_change_source: Option<ChangeSource>,
    parse_error: Option<ParseError>,
    validation_errors: Vec<ValidationError>,
    sync_error: Option<SyncError>,
    dirty: bool,
    touched: HashSet<FieldPath>,
    initial: Snapshot,
    validation: Option<Validation>,
    timers: TimerQueue<EngineTask>,
    pending_validation: Option<TimerId>,
}

impl SyncEngine {
    /// Start from a value tree, serialized in `format`
    pub fn new(values: Value, format: Format, clock: Rc<dyn Clock>) -> Result<Self, SyncError> {
        let content = serialize(&values, format).map_err(|err| SyncError::serialize(format, err))?;
        Ok(Self {
            options: SyncOptions::default(),
            initial: Snapshot {
                values: values.clone(),
                content: content.clone(),
                format,
            },
            values,
            content,
            format,
            last_change_source: None,
            parse_error: None,
            validation_errors: Vec::new(),
            sync_error: None,
            dirty: false,
            touched: HashSet::new(),
            validation: None,
            timers: TimerQueue::new(clock),
            pending_validation: None,
        })
    }

    /// Start from the defaults a schema's field tree declares
    pub fn with_schema_defaults(fields: &FieldNode, format: Format, clock: Rc<dyn Clock>) -> Result<Self, SyncError> {
        Self::new(default_values(fields), format, clock)
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate against `schema` from now on
    pub fn with_validator(mut self, schema: Arc<SchemaDocument>, validator: impl Validator + 'static) -> Self {
        self.set_validator(schema, validator);
        self
    }

    pub fn set_validator(&mut self, schema: Arc<SchemaDocument>, validator: impl Validator + 'static) {
        self.validation = Some(Validation {
            schema,
            validator: Box::new(validator),
        });
    }

    /// Form side: place `value` at `path` and rewrite the text
    pub fn update_from_form(&mut self, path: &FieldPath, value: Value) -> Result<(), SyncError> {
        let next = with_value_at(&self.values, path, value);
        self.commit_form_edit(path, next)
    }

    /// Form side: drop the field at `path` and rewrite the text
    pub fn remove_from_form(&mut self, path: &FieldPath) -> Result<(), SyncError> {
        let next = without_value_at(&self.values, path);
        self.commit_form_edit(path, next)
    }

    fn commit_form_edit(&mut self, path: &FieldPath, next: Value) -> Result<(), SyncError> {
        let content = self.record_sync(self.format, serialize(&next, self.format))?;

        self.values = next;
        self.content = content;
        self.parse_error = None;
        self.last_change_source = Some(ChangeSource::Form);
        self.touched.insert(path.clone());
        self.dirty = self.values != self.initial.values;
        self.validation_errors = locate_errors(&self.validation_errors, &self.content, self.format);
        debug!(path = %path, dirty = self.dirty, "Form edit applied");

        self.schedule_validation();
        Ok(())
    }

    /// Editor side: take `text` as the new content and try to parse it
    pub fn update_from_editor(&mut self, text: impl Into<String>) -> EditOutcome {
        self.content = text.into();
        self.last_change_source = Some(ChangeSource::Editor);
        self.cancel_validation();

        match parse(&self.content, self.format) {
            Ok(values) => {
                self.values = values;
                self.parse_error = None;
                self.dirty = self.values != self.initial.values;
                self.validate_now();
                EditOutcome::Synced
            }
            Err(err) => {
                debug!(line = err.line, column = err.column, "Editor text does not parse");
                self.parse_error = Some(err.clone());
                self.validation_errors.clear();
                self.dirty = true;
                EditOutcome::ParseFailed(err)
            }
        }
    }

    /// Switch the text format, re-serializing the current values
    ///
    /// Unparsed editor text is discarded in favour of the last good values.
    pub fn change_format(&mut self, format: Format) -> Result<(), SyncError> {
        if format == self.format {
            return Ok(());
        }
        let content = self.record_sync(format, serialize(&self.values, format))?;

        info!(from = %self.format, to = %format, "Format changed");
        self.format = format;
        self.content = content;
        self.parse_error = None;
        self.validation_errors = locate_errors(&self.validation_errors, &self.content, self.format);
        Ok(())
    }

    /// Back to the state the engine was created with
    pub fn reset(&mut self) {
        self.values = self.initial.values.clone();
        self.content = self.initial.content.clone();
        self.format = self.initial.format;
        self.last_change_source = None;
        self.parse_error = None;
        self.validation_errors.clear();
        self.sync_error = None;
        self.dirty = false;
        self.touched.clear();
        self.cancel_validation();
        debug!("Engine reset");
    }

    /// Run validation if its debounce period has passed
    pub fn poll(&mut self) {
        while let Some((id, task)) = self.timers.pop_due() {
            match task {
                EngineTask::Validate => {
                    if self.pending_validation == Some(id) {
                        self.pending_validation = None;
                    }
                    self.validate_now();
                }
            }
        }
    }

    /// Validate the current values immediately
    ///
    /// Without a validator every error is cleared.
    pub fn validate_now(&mut self) -> &[ValidationError] {
        self.cancel_validation();
        self.validation_errors = match &self.validation {
            Some(validation) => {
                let report = validation.validator.validate(&validation.schema, &self.values);
                locate_errors(&report.errors, &self.content, self.format)
            }
            None => Vec::new(),
        };
        debug!(errors = self.validation_errors.len(), "Validation finished");
        &self.validation_errors
    }

    pub fn values(&self) -> &Value {
        &self.values
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    pub fn last_change_source(&self) -> Option<ChangeSource> {
        self.last_change_source
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        self.parse_error.as_ref()
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    /// Tooltip lookup: first error per normalized path
    pub fn errors_by_path(&self) -> IndexMap<String, ValidationError> {
        errors_by_path(&self.validation_errors)
    }

    /// Gutter markers for the current text, parse error first
    pub fn annotations(&self) -> Vec<Annotation> {
        let mut annotations: Vec<Annotation> = self.parse_error.iter().map(parse_error_annotation).collect();
        annotations.extend(to_line_annotations(&self.validation_errors, &self.content, self.format));
        annotations
    }

    pub fn sync_error(&self) -> Option<&SyncError> {
        self.sync_error.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_touched(&self, path: &FieldPath) -> bool {
        self.touched.contains(path)
    }

    pub fn touched(&self) -> impl Iterator<Item = &FieldPath> {
        self.touched.iter()
    }

    pub fn has_pending_validation(&self) -> bool {
        self.pending_validation.is_some()
    }

    fn record_sync(&mut self, format: Format, result: Result<String, SerializeError>) -> Result<String, SyncError> {
        match result {
            Ok(text) => {
                self.sync_error = None;
                Ok(text)
            }
            Err(err) => {
                let err = SyncError::serialize(format, err);
                warn!(error = %err, "Sync failed");
                self.sync_error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn schedule_validation(&mut self) {
        self.cancel_validation();
        if self.options.validation_debounce_ms == 0 {
            self.validate_now();
        } else {
            self.pending_validation = Some(
                self.timers
                    .schedule(self.options.validation_debounce_ms, EngineTask::Validate),
            );
        }
    }

    fn cancel_validation(&mut self) {
        if let Some(id) = self.pending_validation.take() {
            self.timers.cancel(id);
        }
    }
}
