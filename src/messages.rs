//! Message types for the workspace command loop
//!
//! Every user command is one message; the follow callbacks run around each.

use crate::host::{Action, ViewId};

/// Direction for cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Move the focused view's cursor one line
    MoveCursor(Direction),
    /// Move the focused view's cursor to the start of a line (0-indexed)
    GotoLine(usize),
    /// Set the focused view's cursor (0-indexed line and column)
    SetCursorPosition { line: usize, column: usize },
    /// Move the cursor to the first character of the focused view
    MoveCursorDocumentStart,
    /// Give focus to another view
    Focus(ViewId),
    /// Run a follow action in the focused view
    Action(Action),
}
