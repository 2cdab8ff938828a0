//! # Focus synchronization
//!
//! Keeps "what the user is looking at" in step between the form and the text.
//!
//! ```text
//!            set_focus_from_form / set_focus_from_editor (debounced)
//!   ┌──────┐ ──────────────────────────────────────────────► ┌─────────┐
//!   │ Idle │                                                  │ Focused │
//!   └──────┘ ◄────────────────────────────────────────────── └─────────┘
//!            clear / auto-clear timer / path gone from content
//! ```
//!
//! Editor-driven focus also reveals the field in the form: ancestors are
//! expanded, the element is located (retrying while the form re-renders),
//! scrolled into view and highlighted.

use crate::timers::{Clock, TimerId, TimerQueue};
use crate::ui::{HighlightId, UiLayer};
use formsync_codec::{FieldPath, Format};
use formsync_sourcemap::{line_for_path, path_at_position};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FocusOptions {
    /// Quiet period before a focus request is applied; 0 applies immediately
    pub debounce_ms: u64,
    /// How long an applied focus stays before clearing itself; 0 keeps it
    pub highlight_duration_ms: u64,
    /// Reveal editor-driven focus in the form
    pub auto_scroll: bool,
    pub scroll_retry_limit: u32,
    pub scroll_retry_delay_ms: u64,
}

impl Default for FocusOptions {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            highlight_duration_ms: 2000,
            auto_scroll: true,
            scroll_retry_limit: 5,
            scroll_retry_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusSource {
    Form,
    Editor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusEvent {
    pub path: FieldPath,
    pub source: FocusSource,
    pub line: Option<usize>,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FocusTask {
    FromForm(FieldPath),
    FromEditor { line: usize, column: usize },
    AutoClear,
    Locate { path: FieldPath, attempt: u32 },
}

type Observer = Box<dyn FnMut(Option<&FocusEvent>)>;

/// Two-state focus machine: `None` is idle, `Some(event)` is focused
pub struct FocusController<U: UiLayer> {
    options: FocusOptions,
    content: String,
    format: Format,
    state: Option<FocusEvent>,
    ui: U,
    observer: Option<Observer>,
    timers: TimerQueue<FocusTask>,
    pending_request: Option<TimerId>,
    auto_clear: Option<TimerId>,
    locate_retry: Option<TimerId>,
    highlight: Option<HighlightId>,
    disposed: bool,
}

impl<U: UiLayer> FocusController<U> {
    pub fn new(content: impl Into<String>, format: Format, ui: U, clock: Rc<dyn Clock>) -> Self {
        Self {
            options: FocusOptions::default(),
            content: content.into(),
            format,
            state: None,
            ui,
            observer: None,
            timers: TimerQueue::new(clock),
            pending_request: None,
            auto_clear: None,
            locate_retry: None,
            highlight: None,
            disposed: false,
        }
    }

    pub fn with_options(mut self, options: FocusOptions) -> Self {
        self.options = options;
        self
    }

    /// Called with the new state after every transition
    pub fn set_observer(&mut self, observer: impl FnMut(Option<&FocusEvent>) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn focus(&self) -> Option<&FocusEvent> {
        self.state.as_ref()
    }

    pub fn options(&self) -> FocusOptions {
        self.options
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn has_pending_request(&self) -> bool {
        self.pending_request.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The form focused a field
    pub fn set_focus_from_form(&mut self, path: FieldPath) {
        self.request(FocusTask::FromForm(path));
    }

    /// The text cursor moved; `line` and `column` are 1-indexed
    pub fn set_focus_from_editor(&mut self, line: usize, column: usize) {
        self.request(FocusTask::FromEditor { line, column });
    }

    /// Drop any focus and pending request
    pub fn clear(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel(Slot::Request);
        self.go_idle();
    }

    /// New document text; keeps the focused path's line current
    ///
    /// Focus on a path that no longer appears in the text is cleared.
    pub fn update_content(&mut self, content: impl Into<String>, format: Format) {
        self.content = content.into();
        self.format = format;

        let Some(path) = self.state.as_ref().map(|event| event.path.clone()) else {
            return;
        };
        match line_for_path(&self.content, &path, self.format) {
            None => {
                debug!(path = %path, "Focused path left the document");
                self.go_idle();
            }
            Some(line) => {
                if let Some(event) = self.state.as_mut().filter(|event| event.line != Some(line)) {
                    event.line = Some(line);
                    self.notify();
                }
            }
        }
    }

    /// Run every timer that is due
    pub fn poll(&mut self) {
        if self.disposed {
            return;
        }
        while let Some((id, task)) = self.timers.pop_due() {
            match task {
                FocusTask::FromForm(_) | FocusTask::FromEditor { .. } => {
                    if self.pending_request == Some(id) {
                        self.pending_request = None;
                    }
                    self.execute(task);
                }
                FocusTask::AutoClear => {
                    self.auto_clear = None;
                    trace!("Focus expired");
                    self.go_idle();
                }
                FocusTask::Locate { path, attempt } => {
                    self.locate_retry = None;
                    self.locate(path, attempt);
                }
            }
        }
    }

    /// Cancel every timer and remove an applied highlight
    ///
    /// The controller ignores all further requests.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.timers.clear();
        self.pending_request = None;
        self.auto_clear = None;
        self.locate_retry = None;
        if let Some(highlight) = self.highlight.take() {
            self.ui.remove_highlight(highlight);
        }
        self.state = None;
        self.disposed = true;
    }

    fn request(&mut self, task: FocusTask) {
        if self.disposed {
            return;
        }
        self.cancel(Slot::Request);
        if self.options.debounce_ms == 0 {
            self.execute(task);
        } else {
            self.pending_request = Some(self.timers.schedule(self.options.debounce_ms, task));
        }
    }

    fn execute(&mut self, task: FocusTask) {
        let now = self.timers.now();
        match task {
            FocusTask::FromForm(path) => {
                let line = line_for_path(&self.content, &path, self.format);
                self.apply(FocusEvent {
                    path,
                    source: FocusSource::Form,
                    line,
                    timestamp: now,
                });
            }
            FocusTask::FromEditor { line, column } => {
                match path_at_position(&self.content, line, column, self.format) {
                    None => {
                        trace!(line, column, "Cursor is not on a field");
                        self.go_idle();
                    }
                    Some(path) => {
                        // The event carries the declaring line, not the cursor line
                        let declared = line_for_path(&self.content, &path, self.format).or(Some(line));
                        self.apply(FocusEvent {
                            path: path.clone(),
                            source: FocusSource::Editor,
                            line: declared,
                            timestamp: now,
                        });
                        if self.options.auto_scroll {
                            self.ui.expand_ancestors(&path);
                            self.locate(path, 0);
                        }
                    }
                }
            }
            FocusTask::AutoClear | FocusTask::Locate { .. } => {}
        }
    }

    fn apply(&mut self, event: FocusEvent) {
        debug!(path = %event.path, source = ?event.source, line = ?event.line, "Focus applied");
        self.cancel(Slot::Locate);
        self.remove_highlight();
        self.cancel(Slot::AutoClear);
        if self.options.highlight_duration_ms > 0 {
            self.auto_clear = Some(
                self.timers
                    .schedule(self.options.highlight_duration_ms, FocusTask::AutoClear),
            );
        }
        self.state = Some(event);
        self.notify();
    }

    fn locate(&mut self, path: FieldPath, attempt: u32) {
        match self.ui.find_element_for_path(&path) {
            Some(element) => {
                self.ui.scroll_into_view(&element);
                self.highlight = Some(self.ui.apply_highlight(&element));
            }
            None if attempt < self.options.scroll_retry_limit => {
                trace!(path = %path, attempt, "Element not rendered yet");
                self.locate_retry = Some(self.timers.schedule(
                    self.options.scroll_retry_delay_ms,
                    FocusTask::Locate {
                        path,
                        attempt: attempt + 1,
                    },
                ));
            }
            None => debug!(path = %path, "Gave up locating element"),
        }
    }

    fn go_idle(&mut self) {
        self.cancel(Slot::Locate);
        self.cancel(Slot::AutoClear);
        self.remove_highlight();
        if self.state.take().is_some() {
            self.notify();
        }
    }

    fn remove_highlight(&mut self) {
        if let Some(highlight) = self.highlight.take() {
            self.ui.remove_highlight(highlight);
        }
    }

    fn cancel(&mut self, slot: Slot) {
        let handle = match slot {
            Slot::Request => self.pending_request.take(),
            Slot::AutoClear => self.auto_clear.take(),
            Slot::Locate => self.locate_retry.take(),
        };
        if let Some(id) = handle {
            self.timers.cancel(id);
        }
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(self.state.as_ref());
        }
    }
}

impl<U: UiLayer> Drop for FocusController<U> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Request,
    AutoClear,
    Locate,
}
