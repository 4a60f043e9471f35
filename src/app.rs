//! Command loop - runs follow callbacks around every workspace command

use crate::follow::{FollowController, SyncOutcome};
use crate::host::{Action, Host, ViewId, ViewKind};
use crate::keymap::{KeyCode, Keystroke};
use crate::messages::{Direction, Msg};
use crate::model::Workspace;
use crate::update::update;

/// A workspace plus the follow controller hooked into its command loop
#[derive(Debug)]
pub struct App {
    pub workspace: Workspace,
    pub follow: FollowController,
}

impl App {
    pub fn new(workspace: Workspace, follow: FollowController) -> Self {
        Self { workspace, follow }
    }

    /// Open a source view
    pub fn open_source(&mut self, name: &str, text: &str) -> ViewId {
        self.workspace.open(name, text)
    }

    /// Open an output view; followed automatically when its kind is registered
    pub fn open_output(&mut self, name: &str, kind: impl Into<ViewKind>, text: &str) -> ViewId {
        let id = self.workspace.open_output(name, kind, text);
        self.follow.view_opened(&mut self.workspace, id);
        id
    }

    pub fn close(&mut self, id: ViewId) {
        self.follow.view_closed(&mut self.workspace, id);
        self.workspace.close(id);
    }

    /// Run one command
    ///
    /// The pre-command callback runs for the focused view if it is hooked;
    /// the post-command callback only runs if that view still has focus
    /// afterwards, so commands that leave the view are not pulled back.
    pub fn dispatch(&mut self, msg: Msg) -> Option<SyncOutcome> {
        self.workspace.clear_transient_notices();

        if let Msg::Action(action) = msg {
            return self.run_action(action);
        }

        let focused = self.workspace.focused_view();
        let hooked = focused.filter(|v| self.workspace.has_command_hooks(*v));
        if let Some(view) = hooked {
            self.follow.pre_command(&mut self.workspace, view);
        }

        update(&mut self.workspace, msg);

        let view = hooked?;
        if self.workspace.focused_view() != Some(view) {
            tracing::debug!(%view, "Focus left followed view, skipping post-command");
            return None;
        }
        Some(self.follow.post_command(&mut self.workspace, view))
    }

    /// Follow actions bypass the command hooks so that switching off leaves
    /// the marks in place; switching on resyncs immediately.
    fn run_action(&mut self, action: Action) -> Option<SyncOutcome> {
        let view = self.workspace.focused_view()?;
        self.follow.handle_action(&mut self.workspace, view, action);
        if !self.workspace.has_command_hooks(view) {
            return None;
        }
        if !self.follow.is_enabled(view) {
            return Some(SyncOutcome::Disabled);
        }
        self.follow.pre_command(&mut self.workspace, view);
        Some(self.follow.post_command(&mut self.workspace, view))
    }

    /// Translate a key press into a command and run it
    pub fn handle_key(&mut self, keystroke: Keystroke) -> Option<SyncOutcome> {
        let focused = self.workspace.focused_view()?;
        if let Some(action) = self.workspace.binding(focused, &keystroke) {
            return self.dispatch(Msg::Action(action));
        }

        let msg = match keystroke.key {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('n') => {
                Msg::MoveCursor(Direction::Down)
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('p') => Msg::MoveCursor(Direction::Up),
            KeyCode::Home => Msg::MoveCursorDocumentStart,
            _ => {
                tracing::debug!("Unbound key {}", keystroke);
                return None;
            }
        };
        self.dispatch(msg)
    }
}
