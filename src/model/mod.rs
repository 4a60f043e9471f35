//! In-memory workspace - a complete [`Host`] over rope-backed views
//!
//! Keeps every rendered region, notice, hooked view and action binding in
//! plain collections so callers (the demo binary, tests) can inspect exactly
//! what the follow core asked the editor to do.

mod view;

pub use view::View;

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use crate::host::{Action, Host, Notice, RegionHandle, Renderer, ViewId, ViewKind};
use crate::keymap::Keystroke;

/// A highlighted region as drawn by the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub handle: RegionHandle,
    pub view: ViewId,
    pub range: Range<usize>,
}

/// Counters of renderer calls, for asserting that nothing was redrawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub marked: usize,
    pub cleared: usize,
}

#[derive(Debug, Default)]
pub struct Workspace {
    views: HashMap<ViewId, View>,
    next_view_id: u64,
    focused: Option<ViewId>,
    regions: HashMap<RegionHandle, Region>,
    next_region: u64,
    render_stats: RenderStats,
    notices: Vec<Notice>,
    hooked: HashSet<ViewId>,
    bindings: HashMap<ViewId, HashMap<Keystroke, Action>>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a source view; the first opened view gets focus
    pub fn open(&mut self, name: &str, text: &str) -> ViewId {
        let id = self.next_id();
        self.insert(View::new(id, name, text))
    }

    /// Open an output view of the given kind
    pub fn open_output(&mut self, name: &str, kind: impl Into<ViewKind>, text: &str) -> ViewId {
        let id = self.next_id();
        self.insert(View::new(id, name, text).with_kind(kind))
    }

    fn next_id(&mut self) -> ViewId {
        self.next_view_id += 1;
        ViewId(self.next_view_id)
    }

    fn insert(&mut self, view: View) -> ViewId {
        let id = view.id;
        tracing::debug!(%id, name = %view.name, "Opened view");
        self.views.insert(id, view);
        if self.focused.is_none() {
            self.focused = Some(id);
        }
        id
    }

    /// Close a view, dropping its regions, hooks and bindings
    pub fn close(&mut self, id: ViewId) -> Option<View> {
        let view = self.views.remove(&id)?;
        self.regions.retain(|_, r| r.view != id);
        self.hooked.remove(&id);
        self.bindings.remove(&id);
        if self.focused == Some(id) {
            self.focused = self.views.keys().min().copied();
        }
        Some(view)
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    pub fn focused_view_mut(&mut self) -> Option<&mut View> {
        let id = self.focused?;
        self.views.get_mut(&id)
    }

    /// All regions currently drawn in `view`, ordered by position
    pub fn regions_in(&self, view: ViewId) -> Vec<Range<usize>> {
        let mut ranges: Vec<Range<usize>> = self
            .regions
            .values()
            .filter(|r| r.view == view)
            .map(|r| r.range.clone())
            .collect();
        ranges.sort_by_key(|r| (r.start, r.end));
        ranges
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    pub fn render_stats(&self) -> RenderStats {
        self.render_stats
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Remove and return every notice, transient or not
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Drop transient notices (done by the command loop before each command)
    pub fn clear_transient_notices(&mut self) {
        self.notices.retain(|n| !n.transient);
    }

    pub fn has_command_hooks(&self, view: ViewId) -> bool {
        self.hooked.contains(&view)
    }

    /// Action bound to `keystroke` in `view`
    pub fn binding(&self, view: ViewId, keystroke: &Keystroke) -> Option<Action> {
        self.bindings.get(&view)?.get(keystroke).copied()
    }
}

impl Renderer for Workspace {
    fn mark_region(&mut self, view: ViewId, range: Range<usize>) -> RegionHandle {
        self.next_region += 1;
        let handle = RegionHandle(self.next_region);
        self.regions.insert(
            handle,
            Region {
                handle,
                view,
                range,
            },
        );
        self.render_stats.marked += 1;
        handle
    }

    fn clear_region(&mut self, handle: RegionHandle) {
        self.regions.remove(&handle);
        self.render_stats.cleared += 1;
    }
}

impl Host for Workspace {
    fn focused_view(&self) -> Option<ViewId> {
        self.focused
    }

    fn focus_view(&mut self, view: ViewId) {
        if self.views.contains_key(&view) {
            self.focused = Some(view);
        }
    }

    fn cursor(&self, view: ViewId) -> Option<usize> {
        self.views.get(&view).map(|v| v.cursor)
    }

    fn set_cursor(&mut self, view: ViewId, offset: usize) {
        if let Some(v) = self.views.get_mut(&view) {
            v.set_cursor(offset);
        }
    }

    fn line_range(&self, view: ViewId, offset: usize) -> Option<Range<usize>> {
        self.views.get(&view).map(|v| v.line_range_at(offset))
    }

    fn line_of(&self, view: ViewId, offset: usize) -> Option<usize> {
        self.views.get(&view).map(|v| v.offset_to_cursor(offset).0)
    }

    fn line_offset(&self, view: ViewId, line: usize) -> Option<usize> {
        let v = self.views.get(&view)?;
        (line < v.line_count()).then(|| v.buffer.line_to_char(line))
    }

    fn line_text(&self, view: ViewId, offset: usize) -> Option<String> {
        let v = self.views.get(&view)?;
        Some(v.line_text(v.offset_to_cursor(offset).0))
    }

    fn view_kind(&self, view: ViewId) -> Option<ViewKind> {
        self.views.get(&view).and_then(|v| v.kind.clone())
    }

    fn set_visible_lines(&mut self, view: ViewId, lines: usize) {
        if let Some(v) = self.views.get_mut(&view) {
            v.visible_lines = lines;
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn add_command_hooks(&mut self, view: ViewId) {
        self.hooked.insert(view);
    }

    fn remove_command_hooks(&mut self, view: ViewId) {
        self.hooked.remove(&view);
    }

    fn bind_action(&mut self, view: ViewId, trigger: Keystroke, action: Action) {
        self.bindings
            .entry(view)
            .or_default()
            .insert(trigger, action);
    }

    fn unbind_action(&mut self, view: ViewId, trigger: Keystroke) {
        if let Some(map) = self.bindings.get_mut(&view) {
            map.remove(&trigger);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_view_gets_focus() {
        let mut ws = Workspace::new();
        let a = ws.open("a.rs", "fn main() {}\n");
        let _b = ws.open("b.rs", "");
        assert_eq!(ws.focused_view(), Some(a));
    }

    #[test]
    fn test_close_drops_regions_and_hooks() {
        let mut ws = Workspace::new();
        let a = ws.open("a.rs", "one\ntwo\n");
        ws.mark_region(a, 0..3);
        ws.add_command_hooks(a);
        ws.close(a);
        assert!(ws.regions_in(a).is_empty());
        assert!(!ws.has_command_hooks(a));
        assert_eq!(ws.focused_view(), None);
    }

    #[test]
    fn test_focus_unknown_view_is_ignored() {
        let mut ws = Workspace::new();
        let a = ws.open("a.rs", "");
        ws.focus_view(ViewId(99));
        assert_eq!(ws.focused_view(), Some(a));
    }

    #[test]
    fn test_take_notices_drains_persistent_ones() {
        let mut ws = Workspace::new();
        ws.notify(Notice::warning("no resolver"));
        assert_eq!(ws.take_notices().len(), 1);
        assert!(ws.notices().is_empty());
        assert!(ws.take_notices().is_empty());
    }

    #[test]
    fn test_transient_notices_cleared() {
        let mut ws = Workspace::new();
        ws.notify(Notice::info("on"));
        ws.notify(Notice::error("broken"));
        ws.clear_transient_notices();
        assert_eq!(ws.notices().len(), 1);
        assert_eq!(ws.notices()[0].message, "broken");
    }
}
