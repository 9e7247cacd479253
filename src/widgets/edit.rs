//! Grapheme-aware edit buffer shared by the text widgets.
//!
//! The cursor is a grapheme index, never a byte offset, so combining marks
//! and emoji sequences move and delete as one unit.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EditBuffer {
    text: String,
    cursor: usize,
}

impl EditBuffer {
    /// Buffer holding `text` with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let mut buf = Self::default();
        buf.set(text.into());
        buf
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in graphemes.
    pub fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Length in Unicode scalar values, the unit length rules count in.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn set(&mut self, text: String) {
        self.text = text;
        self.cursor = self.len();
    }

    fn byte_offset(&self, idx: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(idx)
            .map_or(self.text.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, c);
        // A combining mark joins the previous grapheme.
        self.cursor = self.text[..at + c.len_utf8()].graphemes(true).count();
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.text.replace_range(start..end, "");
        true
    }

    pub fn left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn right(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    // ── line-oriented movement ──────────────────────────────────

    /// Grapheme index where the cursor's line starts, and the column.
    fn line_position(&self) -> (usize, usize) {
        let start = self
            .text
            .graphemes(true)
            .take(self.cursor)
            .enumerate()
            .filter(|(_, g)| *g == "\n")
            .last()
            .map_or(0, |(i, _)| i + 1);
        (start, self.cursor - start)
    }

    /// Index of the first newline at or after `from`, or the buffer length.
    fn line_end_from(&self, from: usize) -> usize {
        self.text
            .graphemes(true)
            .enumerate()
            .skip(from)
            .find(|(_, g)| *g == "\n")
            .map_or_else(|| self.len(), |(i, _)| i)
    }

    pub fn home(&mut self) -> bool {
        let (start, _) = self.line_position();
        let moved = start != self.cursor;
        self.cursor = start;
        moved
    }

    pub fn end(&mut self) -> bool {
        let end = self.line_end_from(self.cursor);
        let moved = end != self.cursor;
        self.cursor = end;
        moved
    }

    pub fn up(&mut self) -> bool {
        let (start, col) = self.line_position();
        if start == 0 {
            return false;
        }
        let prev_end = start - 1;
        let prev_start = self
            .text
            .graphemes(true)
            .take(prev_end)
            .enumerate()
            .filter(|(_, g)| *g == "\n")
            .last()
            .map_or(0, |(i, _)| i + 1);
        self.cursor = prev_start + col.min(prev_end - prev_start);
        true
    }

    pub fn down(&mut self) -> bool {
        let (_, col) = self.line_position();
        let newline = self.line_end_from(self.cursor);
        if newline >= self.len() {
            return false;
        }
        let next_start = newline + 1;
        let next_end = self.line_end_from(next_start);
        self.cursor = next_start + col.min(next_end - next_start);
        true
    }

    /// Zero-based line index of the cursor.
    pub fn cursor_line(&self) -> usize {
        self.text
            .graphemes(true)
            .take(self.cursor)
            .filter(|g| *g == "\n")
            .count()
    }

    /// The text with `marker` spliced in at the cursor.
    pub fn with_marker(&self, marker: char) -> String {
        let mut out = self.text.clone();
        out.insert(self.byte_offset(self.cursor), marker);
        out
    }
}
