//! Highlight manager - the two process-wide mark slots
//!
//! Slot 0 marks the resolved line in the source view, slot 1 marks the
//! selected item in the output view. Marking a slot again moves it; a slot is
//! never attached twice.

use std::ops::Range;

use super::error::FollowError;
use crate::host::{RegionHandle, Renderer, ViewId};

/// Fixed mark slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Source = 0,
    Output = 1,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Source, Slot::Output];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Where a mark is currently drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub view: ViewId,
    pub range: Range<usize>,
    pub handle: RegionHandle,
}

/// A single mark slot; detached when `attachment` is `None`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    pub slot: Slot,
    pub attachment: Option<Attachment>,
}

impl Mark {
    fn detached(slot: Slot) -> Self {
        Self {
            slot,
            attachment: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    pub fn view(&self) -> Option<ViewId> {
        self.attachment.as_ref().map(|a| a.view)
    }

    /// The covered range; empty when detached
    pub fn range(&self) -> Range<usize> {
        self.attachment
            .as_ref()
            .map(|a| a.range.clone())
            .unwrap_or(0..0)
    }
}

/// Exactly two marks, indexed by [`Slot`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkSet {
    marks: [Mark; 2],
}

impl Default for MarkSet {
    fn default() -> Self {
        Self {
            marks: [Mark::detached(Slot::Source), Mark::detached(Slot::Output)],
        }
    }
}

impl MarkSet {
    pub fn get(&self, slot: Slot) -> &Mark {
        &self.marks[slot.index()]
    }

    fn get_mut(&mut self, slot: Slot) -> &mut Mark {
        &mut self.marks[slot.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.marks.iter()
    }

    pub fn all_detached(&self) -> bool {
        self.marks.iter().all(|m| !m.is_attached())
    }
}

/// Owns the [`MarkSet`] and keeps the renderer in step with it
#[derive(Debug, Default)]
pub struct HighlightManager {
    marks: MarkSet,
    /// Output view whose command placed the current marks
    owner: Option<ViewId>,
}

impl HighlightManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marks(&self) -> &MarkSet {
        &self.marks
    }

    pub fn mark_at(&self, slot: Slot) -> &Mark {
        self.marks.get(slot)
    }

    pub fn owner(&self) -> Option<ViewId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<ViewId>) {
        self.owner = owner;
    }

    /// Attach `slot` to `view` over `[begin, end)`, moving it if already attached
    ///
    /// Re-marking the exact same view and range draws nothing. A reversed
    /// range is rejected with [`FollowError::InvalidRange`] and nothing
    /// changes; the manager has no notice channel, so the caller reports it
    /// (the sync engine turns it into an unmatched cycle with a warning).
    pub fn mark<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        slot: Slot,
        view: ViewId,
        begin: usize,
        end: usize,
    ) -> Result<(), FollowError> {
        if begin > end {
            return Err(FollowError::InvalidRange { begin, end });
        }

        let mark = self.marks.get_mut(slot);
        if let Some(current) = &mark.attachment {
            if current.view == view && current.range == (begin..end) {
                return Ok(());
            }
        }

        if let Some(previous) = mark.attachment.take() {
            renderer.clear_region(previous.handle);
        }
        let handle = renderer.mark_region(view, begin..end);
        tracing::trace!(?slot, %view, begin, end, "mark attached");
        mark.attachment = Some(Attachment {
            view,
            range: begin..end,
            handle,
        });
        Ok(())
    }

    /// Detach `slot`; returns whether anything was cleared
    pub fn unmark<R: Renderer + ?Sized>(&mut self, renderer: &mut R, slot: Slot) -> bool {
        match self.marks.get_mut(slot).attachment.take() {
            Some(previous) => {
                renderer.clear_region(previous.handle);
                tracing::trace!(?slot, view = %previous.view, "mark detached");
                true
            }
            None => false,
        }
    }

    /// Detach every slot attached to `view`; returns whether anything was cleared
    pub fn unmark_view<R: Renderer + ?Sized>(&mut self, renderer: &mut R, view: ViewId) -> bool {
        let mut cleared = false;
        for slot in Slot::ALL {
            if self.marks.get(slot).view() == Some(view) {
                cleared |= self.unmark(renderer, slot);
            }
        }
        if self.marks.all_detached() {
            self.owner = None;
        }
        cleared
    }

    /// Detach both slots
    pub fn unmark_all<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        for slot in Slot::ALL {
            self.unmark(renderer, slot);
        }
        self.owner = None;
    }
}
