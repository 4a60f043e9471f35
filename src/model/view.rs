//! A text view - a rope buffer with a single cursor

use std::ops::Range;

use ropey::Rope;

use crate::host::{ViewId, ViewKind};

/// An output listing or a source buffer shown in the workspace
#[derive(Debug, Clone)]
pub struct View {
    pub id: ViewId,
    /// Display name (file name, "*occur*", ...)
    pub name: String,
    /// Set for output views that list navigable items
    pub kind: Option<ViewKind>,
    pub buffer: Rope,
    /// Cursor as a char offset into `buffer`
    pub cursor: usize,
    /// Number of visible lines
    pub visible_lines: usize,
}

impl View {
    pub fn new(id: ViewId, name: impl Into<String>, text: &str) -> Self {
        Self {
            id,
            name: name.into(),
            kind: None,
            buffer: Rope::from_str(text),
            cursor: 0,
            visible_lines: 25,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<ViewKind>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Length of a line in characters, excluding the newline
    pub fn line_length(&self, line_idx: usize) -> usize {
        if line_idx >= self.buffer.len_lines() {
            return 0;
        }
        let line = self.buffer.line(line_idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            if len > 1 && line.char(len - 2) == '\r' {
                len - 2
            } else {
                len - 1
            }
        } else {
            len
        }
    }

    /// Char range of line `line_idx`, without its terminator
    pub fn line_char_range(&self, line_idx: usize) -> Range<usize> {
        let line_idx = line_idx.min(self.buffer.len_lines().saturating_sub(1));
        let start = self.buffer.line_to_char(line_idx);
        start..start + self.line_length(line_idx)
    }

    /// Char range of the line containing `offset`
    pub fn line_range_at(&self, offset: usize) -> Range<usize> {
        let (line, _) = self.offset_to_cursor(offset);
        self.line_char_range(line)
    }

    /// Convert (line, column) to a char offset, clamping both
    pub fn cursor_to_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.buffer.len_lines() {
            return self.buffer.len_chars();
        }
        let line_start = self.buffer.line_to_char(line);
        line_start + column.min(self.line_length(line))
    }

    /// Convert a char offset to (line, column)
    pub fn offset_to_cursor(&self, offset: usize) -> (usize, usize) {
        let clamped = offset.min(self.buffer.len_chars());
        let line = self.buffer.char_to_line(clamped);
        let line_start = self.buffer.line_to_char(line);
        (line, clamped - line_start)
    }

    pub fn cursor_line(&self) -> usize {
        self.offset_to_cursor(self.cursor).0
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.buffer.len_chars());
    }

    /// Move the cursor to the start of `line` (clamped to the last line)
    pub fn goto_line(&mut self, line: usize) {
        let line = line.min(self.buffer.len_lines().saturating_sub(1));
        self.cursor = self.buffer.line_to_char(line);
    }

    /// Text of a line without its terminator
    pub fn line_text(&self, line_idx: usize) -> String {
        let range = self.line_char_range(line_idx);
        self.buffer.slice(range).to_string()
    }
}
