//! Position mapping between field paths and text locations
//!
//! Both directions share one forward scan per format, so a path's line and
//! the path found at that line always agree:
//!
//! ```text
//!   line_for_path(text, "config.host") ──► 3
//!   path_at_position(text, 3, 3)       ──► config.host
//! ```
//!
//! Nothing is cached: every call rescans the current text.

mod flow;
pub mod mapping;
mod structured;

pub use formsync_codec::{line_col_to_offset, offset_to_line_col};
pub use mapping::{line_for_path, mapping_for_path, mappings, path_at_position, LineMapping};
