//! # formsync editor
//!
//! Keeps a form and a code editor showing the same document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ codec: value tree ⇄ structured / flow text  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor                                      │
//! │  - SyncEngine: form edits ⇄ text edits      │
//! │  - diagnostics: errors → lines, annotations │
//! │  - FocusController: cursor ⇄ form field     │
//! │  - timers: debounce without threads         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ UiLayer: expand, scroll, highlight          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Last edit wins**: whichever view changed most recently is the truth
//! 2. **Parse errors are data**: bad text never corrupts the form values
//! 3. **No hidden time**: every delay is a timer fired from `poll()`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formsync_editor::{EditSession, FocusOptions, HeadlessUi, SyncEngine, SystemClock};
//! use formsync_codec::Format;
//! use std::rc::Rc;
//!
//! let clock = Rc::new(SystemClock::new());
//! let engine = SyncEngine::new(serde_json::json!({"name": "api"}), Format::Structured, clock.clone())?;
//! let mut session = EditSession::new(engine, HeadlessUi, FocusOptions::default(), clock);
//!
//! session.replace_text("name: web\n")?;
//! session.focus_from_editor(1, 1);
//! session.poll();
//! ```

mod diagnostics;
mod document;
mod edits;
mod errors;
mod focus;
mod session;
mod timers;
mod ui;

pub use diagnostics::{
    errors_by_path, locate_errors, parse_error_annotation, to_line_annotations, Annotation, AnnotationKind,
};
pub use document::{ChangeSource, EditOutcome, SyncEngine, SyncOptions};
pub use edits::Edit;
pub use errors::{EditorError, SyncError};
pub use focus::{FocusController, FocusEvent, FocusOptions, FocusSource};
pub use session::EditSession;
pub use timers::{Clock, ManualClock, SystemClock, TimerId, TimerQueue};
pub use ui::{HeadlessUi, HighlightId, UiLayer};
