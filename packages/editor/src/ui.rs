//! Presentation side effects, kept behind a trait

use formsync_codec::FieldPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlightId(pub u64);

/// The form view as seen by the focus controller
///
/// A path without a rendered element is not an error: `find_element_for_path`
/// returns `None` and the caller retries or gives up.
pub trait UiLayer {
    type Element;

    fn find_element_for_path(&mut self, path: &FieldPath) -> Option<Self::Element>;

    /// Open every collapsed section containing `path`
    fn expand_ancestors(&mut self, path: &FieldPath);

    fn scroll_into_view(&mut self, element: &Self::Element);

    fn apply_highlight(&mut self, element: &Self::Element) -> HighlightId;

    fn remove_highlight(&mut self, highlight: HighlightId);
}

/// A UI with nothing rendered
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessUi;

impl UiLayer for HeadlessUi {
    type Element = ();

    fn find_element_for_path(&mut self, _path: &FieldPath) -> Option<()> {
        None
    }

    fn expand_ancestors(&mut self, _path: &FieldPath) {}

    fn scroll_into_view(&mut self, _element: &()) {}

    fn apply_highlight(&mut self, _element: &()) -> HighlightId {
        HighlightId(0)
    }

    fn remove_highlight(&mut self, _highlight: HighlightId) {}
}
