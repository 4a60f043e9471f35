//! Host interface - everything the follow core needs from the editor around it
//!
//! The core never reads "the current buffer" implicitly. Every query names the
//! view it is about, so the engine can be driven by any host (the in-memory
//! [`Workspace`](crate::model::Workspace), a terminal UI, a test double).

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::keymap::Keystroke;

/// Unique identifier for a view (an output listing or a source buffer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Identifier of an output view type ("occurrences", "diagnostics", "outline")
///
/// Only ever used as a registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewKind(String);

impl ViewKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ViewKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for ViewKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cursor position in a specific view (char offset into the view's text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub view: ViewId,
    pub offset: usize,
}

impl Location {
    pub fn new(view: ViewId, offset: usize) -> Self {
        Self { view, offset }
    }
}

/// Handle to a region drawn by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RegionHandle(pub u64);

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown to the user (status bar, echo area, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Transient notices disappear on the next command
    pub transient: bool,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            transient: true,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            transient: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            transient: false,
        }
    }

    /// Make the notice disappear on the next command
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }
}

/// Actions the follow core binds to keystrokes in a followed view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ToggleFollow,
}

/// Draws and clears highlighted regions
pub trait Renderer {
    /// Highlight `range` (half-open char offsets) in `view`
    fn mark_region(&mut self, view: ViewId, range: Range<usize>) -> RegionHandle;

    /// Remove a region previously returned by [`Renderer::mark_region`]
    fn clear_region(&mut self, handle: RegionHandle);
}

/// The editor hosting follow sessions
pub trait Host: Renderer {
    /// The view currently receiving input
    fn focused_view(&self) -> Option<ViewId>;

    /// Give input focus to `view`
    fn focus_view(&mut self, view: ViewId);

    /// Cursor char offset of `view`, or `None` if the view does not exist
    fn cursor(&self, view: ViewId) -> Option<usize>;

    /// Move the cursor of `view` (clamped to the view's length)
    fn set_cursor(&mut self, view: ViewId, offset: usize);

    /// Char range of the line containing `offset`, without the line terminator
    fn line_range(&self, view: ViewId, offset: usize) -> Option<Range<usize>>;

    /// 0-indexed line containing `offset`
    fn line_of(&self, view: ViewId, offset: usize) -> Option<usize>;

    /// Char offset of the start of `line` (0-indexed), if the line exists
    fn line_offset(&self, view: ViewId, line: usize) -> Option<usize>;

    /// Text of the line containing `offset`, without the line terminator
    fn line_text(&self, view: ViewId, offset: usize) -> Option<String>;

    /// Kind of an output view, if the host knows one
    fn view_kind(&self, view: ViewId) -> Option<ViewKind>;

    /// Resize the visible area of `view` to `lines` lines
    fn set_visible_lines(&mut self, view: ViewId, lines: usize);

    /// Show a notice to the user
    fn notify(&mut self, notice: Notice);

    /// Run the follow pre/post command callbacks for commands in `view`
    fn add_command_hooks(&mut self, view: ViewId);

    /// Stop running the follow callbacks for `view`
    fn remove_command_hooks(&mut self, view: ViewId);

    /// Bind `trigger` to `action` while `view` is focused
    fn bind_action(&mut self, view: ViewId, trigger: Keystroke, action: Action);

    /// Remove a binding added with [`Host::bind_action`]
    fn unbind_action(&mut self, view: ViewId, trigger: Keystroke);
}
