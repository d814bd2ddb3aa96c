//! Key handling for the dashboard

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    None,
    /// The query text changed
    QueryChanged,
    /// Cursor moved without changing the query
    CursorMoved,
    NextCategory,
    PrevCategory,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Quit,
}

/// Search box editing state
///
/// Note: `cursor` is a CHARACTER index, not a byte index.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub buffer: String,
    /// Cursor position in buffer (character index)
    pub cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `text` and the cursor at its end
    pub fn with_text(text: &str) -> Self {
        let mut state = Self::new();
        state.set_buffer(text);
        state
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_idx)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.buffer.len())
    }

    fn insert_char(&mut self, c: char) {
        let byte_idx = self.char_to_byte_index(self.cursor);
        self.buffer.insert(byte_idx, c);
        self.cursor += 1;
    }

    fn remove_char_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.remove_char_at_cursor()
    }

    fn remove_char_at_cursor(&mut self) -> bool {
        let byte_idx = self.char_to_byte_index(self.cursor);
        match self.buffer[byte_idx..].chars().next() {
            Some(ch) => {
                self.buffer.replace_range(byte_idx..byte_idx + ch.len_utf8(), "");
                true
            }
            None => false,
        }
    }

    fn delete_word(&mut self) -> bool {
        let start = self.cursor;
        let chars: Vec<char> = self.buffer.chars().collect();

        let mut cut = self.cursor;
        while cut > 0 && chars[cut - 1] == ' ' {
            cut -= 1;
        }
        while cut > 0 && chars[cut - 1] != ' ' {
            cut -= 1;
        }

        let from = self.char_to_byte_index(cut);
        let to = self.char_to_byte_index(start);
        self.buffer.replace_range(from..to, "");
        self.cursor = cut;
        cut != start
    }

    fn clear(&mut self) -> bool {
        let had_text = !self.buffer.is_empty();
        self.buffer.clear();
        self.cursor = 0;
        had_text
    }

    fn edited(changed: bool) -> InputAction {
        if changed {
            InputAction::QueryChanged
        } else {
            InputAction::None
        }
    }

    /// Handle a key event and return the action
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') if ctrl => InputAction::Quit,

            KeyCode::Char('u') if ctrl => Self::edited(self.clear()),
            KeyCode::Char('w') if ctrl => Self::edited(self.delete_word()),
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                InputAction::CursorMoved
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.char_count();
                InputAction::CursorMoved
            }

            KeyCode::Esc => Self::edited(self.clear()),
            KeyCode::Backspace => Self::edited(self.remove_char_before_cursor()),
            KeyCode::Delete => Self::edited(self.remove_char_at_cursor()),

            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputAction::CursorMoved
            }
            KeyCode::Right => {
                if self.cursor < self.char_count() {
                    self.cursor += 1;
                }
                InputAction::CursorMoved
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputAction::CursorMoved
            }
            KeyCode::End => {
                self.cursor = self.char_count();
                InputAction::CursorMoved
            }

            KeyCode::Tab => InputAction::NextCategory,
            KeyCode::BackTab => InputAction::PrevCategory,

            // Alternate scroll mode turns the mouse wheel into arrows
            KeyCode::Up => InputAction::ScrollUp,
            KeyCode::Down => InputAction::ScrollDown,
            KeyCode::PageUp => InputAction::PageUp,
            KeyCode::PageDown => InputAction::PageDown,

            KeyCode::Char(c) if !ctrl => {
                self.insert_char(c);
                InputAction::QueryChanged
            }

            _ => InputAction::None,
        }
    }

    /// Replace the buffer and move the cursor to its end
    pub fn set_buffer(&mut self, content: &str) {
        self.buffer = content.to_string();
        self.cursor = self.char_count();
    }

    /// Cursor position in terminal columns
    pub fn cursor_display_width(&self) -> usize {
        self.buffer
            .chars()
            .take(self.cursor)
            .map(|c| unicode_width::UnicodeWidthChar::width(c).unwrap_or(0))
            .sum()
    }
}
