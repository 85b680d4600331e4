//! Input mode and the manual-entry text buffer.
//!
//! Each screen is either in list-selection mode or manual-entry mode. Manual
//! mode owns a [`TextBuffer`]; leaving manual mode drops the buffer.

/// UTF-8 safe text buffer with a byte cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    /// Byte index into `text`, always on a char boundary
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer prefilled with `text`, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Blank buffers count as empty.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of chars before the cursor, for terminal cursor placement.
    pub fn cursor_column(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.text[..self.cursor].chars().last() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.text[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the char immediately before the cursor.
    pub fn backspace(&mut self) {
        let Some(prev) = self.text[..self.cursor].chars().last() else {
            return;
        };
        let start = self.cursor - prev.len_utf8();
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Select,
    Manual(TextBuffer),
}

impl InputMode {
    pub fn is_manual(&self) -> bool {
        matches!(self, InputMode::Manual(_))
    }

    pub fn buffer(&self) -> Option<&TextBuffer> {
        match self {
            InputMode::Manual(buffer) => Some(buffer),
            InputMode::Select => None,
        }
    }

    pub fn buffer_mut(&mut self) -> Option<&mut TextBuffer> {
        match self {
            InputMode::Manual(buffer) => Some(buffer),
            InputMode::Select => None,
        }
    }

    /// Flip between the two modes. Entering manual mode starts with an empty buffer.
    pub fn toggled(&self) -> InputMode {
        match self {
            InputMode::Select => InputMode::Manual(TextBuffer::new()),
            InputMode::Manual(_) => InputMode::Select,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_insert_and_backspace() {
        let mut buffer = TextBuffer::with_text("h🙂llo");
        buffer.move_left();
        buffer.move_left();
        buffer.move_left();
        buffer.move_left();
        assert_eq!(buffer.cursor_column(), 1);
        buffer.insert_char('e');
        assert_eq!(buffer.text(), "he🙂llo");
        buffer.move_right();
        buffer.backspace();
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.cursor_column(), 2);
    }

    #[test]
    fn backspace_at_start_is_a_no_op() {
        let mut buffer = TextBuffer::new();
        buffer.backspace();
        buffer.move_left();
        assert_eq!(buffer, TextBuffer::new());
    }

    #[test]
    fn toggling_discards_the_buffer() {
        let mode = InputMode::Manual(TextBuffer::with_text("draft"));
        assert_eq!(mode.toggled(), InputMode::Select);
        assert_eq!(InputMode::Select.toggled(), InputMode::Manual(TextBuffer::new()));
    }
}
