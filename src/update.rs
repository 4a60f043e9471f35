//! Update functions for workspace commands
//!
//! Pure state transitions on the [`Workspace`]; follow callbacks are run
//! around them by [`App`](crate::app::App).

use crate::host::Host;
use crate::messages::{Direction, Msg};
use crate::model::Workspace;

/// Apply a movement/focus message; returns whether anything changed
pub fn update(model: &mut Workspace, msg: Msg) -> bool {
    match msg {
        Msg::MoveCursor(direction) => {
            let Some(view) = model.focused_view_mut() else {
                return false;
            };
            let (line, column) = view.offset_to_cursor(view.cursor);
            let target = match direction {
                Direction::Up if line > 0 => line - 1,
                Direction::Down if line + 1 < view.line_count() => line + 1,
                _ => return false,
            };
            view.cursor = view.cursor_to_offset(target, column);
            true
        }

        Msg::GotoLine(line) => {
            let Some(view) = model.focused_view_mut() else {
                return false;
            };
            let before = view.cursor;
            view.goto_line(line);
            view.cursor != before
        }

        Msg::SetCursorPosition { line, column } => {
            let Some(view) = model.focused_view_mut() else {
                return false;
            };
            let before = view.cursor;
            view.cursor = view.cursor_to_offset(line, column);
            view.cursor != before
        }

        Msg::MoveCursorDocumentStart => {
            let Some(view) = model.focused_view_mut() else {
                return false;
            };
            let moved = view.cursor != 0;
            view.cursor = 0;
            moved
        }

        Msg::Focus(id) => {
            let before = model.focused_view();
            model.focus_view(id);
            model.focused_view() != before
        }

        // actions are routed by the command loop
        Msg::Action(_) => false,
    }
}
