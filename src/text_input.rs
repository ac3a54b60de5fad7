use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharClass {
    Word,
    Whitespace,
    Other,
}

/// Multi-line text field state for the pattern box. Offsets are UTF-8 byte
/// offsets and always sit on char boundaries.
#[derive(Clone, Debug)]
pub struct TextInputState {
    text: String,
    cursor: usize,
    max_chars: Option<usize>,
}

impl TextInputState {
    #[inline]
    fn char_class(ch: char) -> CharClass {
        if ch.is_alphanumeric() || ch == '_' {
            CharClass::Word
        } else if ch.is_whitespace() {
            CharClass::Whitespace
        } else {
            CharClass::Other
        }
    }

    pub fn new(text: String) -> Self {
        let mut state = Self {
            text,
            cursor: 0,
            max_chars: None,
        };
        state.move_to_end();
        state
    }

    /// Inserts past this many chars are truncated.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        if let Some((cut, _)) = self.text.char_indices().nth(max_chars) {
            self.text.truncate(cut);
            self.cursor = self.cursor.min(cut);
        }
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
        if let Some(max_chars) = self.max_chars
            && let Some((cut, _)) = self.text.char_indices().nth(max_chars)
        {
            self.text.truncate(cut);
        }
        self.move_to_end();
    }

    pub fn clear(&mut self) {
        self.set_text(String::new());
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = Self::clamp_utf8_index(&self.text, offset);
    }

    fn clamp_utf8_index(text: &str, offset: usize) -> usize {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    fn previous_char_boundary(&self, offset: usize) -> usize {
        self.text[..offset]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_char_boundary(&self, offset: usize) -> usize {
        self.text[offset..]
            .chars()
            .next()
            .map(|ch| offset + ch.len_utf8())
            .unwrap_or(self.text.len())
    }

    fn previous_word_boundary(&self, offset: usize) -> usize {
        let mut chars = self.text[..offset].char_indices().rev().peekable();
        while let Some((_, ch)) = chars.peek() {
            if Self::char_class(*ch) != CharClass::Whitespace {
                break;
            }
            chars.next();
        }
        let Some((mut start, first)) = chars.next() else {
            return 0;
        };
        let class = Self::char_class(first);
        for (i, ch) in chars {
            if Self::char_class(ch) != class {
                break;
            }
            start = i;
        }
        start
    }

    fn line_start(&self, offset: usize) -> usize {
        self.text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self, offset: usize) -> usize {
        self.text[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(self.text.len())
    }

    /// Cursor as (line, column in chars).
    pub fn cursor_position(&self) -> (usize, usize) {
        let line = self.text[..self.cursor].matches('\n').count();
        let col = self.text[self.line_start(self.cursor)..self.cursor]
            .chars()
            .count();
        (line, col)
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    pub fn insert(&mut self, text: &str) {
        let text = match self.max_chars {
            Some(max_chars) => {
                let room = max_chars.saturating_sub(self.text.chars().count());
                match text.char_indices().nth(room) {
                    Some((cut, _)) => &text[..cut],
                    None => text,
                }
            }
            None => text,
        };
        self.text.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    pub fn insert_newline(&mut self) {
        self.insert("\n");
    }

    fn delete_range(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        self.text.replace_range(range.clone(), "");
        self.set_cursor(range.start);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.previous_char_boundary(self.cursor);
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_char_boundary(self.cursor);
    }

    pub fn move_up(&mut self) {
        let start = self.line_start(self.cursor);
        if start == 0 {
            self.move_to_start();
            return;
        }
        let col = self.text[start..self.cursor].chars().count();
        let prev_start = self.line_start(start - 1);
        self.move_to_column(prev_start, start - 1, col);
    }

    pub fn move_down(&mut self) {
        let end = self.line_end(self.cursor);
        if end == self.text.len() {
            self.move_to_end();
            return;
        }
        let col = self.text[self.line_start(self.cursor)..self.cursor]
            .chars()
            .count();
        let next_start = end + 1;
        let next_end = self.line_end(next_start);
        self.move_to_column(next_start, next_end, col);
    }

    fn move_to_column(&mut self, line_start: usize, line_end: usize, col: usize) {
        let offset = self.text[line_start..line_end]
            .char_indices()
            .nth(col)
            .map(|(i, _)| line_start + i)
            .unwrap_or(line_end);
        self.set_cursor(offset);
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor = self.line_start(self.cursor);
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor = self.line_end(self.cursor);
    }

    pub fn delete_backward(&mut self) {
        let start = self.previous_char_boundary(self.cursor);
        self.delete_range(start..self.cursor);
    }

    pub fn delete_forward(&mut self) {
        let end = self.next_char_boundary(self.cursor);
        self.delete_range(self.cursor..end);
    }

    pub fn delete_word_backward(&mut self) {
        let start = self.previous_word_boundary(self.cursor);
        self.delete_range(start..self.cursor);
    }

    pub fn delete_to_line_start(&mut self) {
        let start = self.line_start(self.cursor);
        self.delete_range(start..self.cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_places_cursor_at_end() {
        let state = TextInputState::new("cat\ndog".to_string());
        assert_eq!(state.cursor_position(), (1, 3));
        assert_eq!(state.line_count(), 2);
    }

    #[test]
    fn insert_respects_max_chars() {
        let mut state = TextInputState::new(String::new()).with_max_chars(5);
        state.insert("abc");
        state.insert("défg");
        assert_eq!(state.text(), "abcdé");
        state.insert("x");
        assert_eq!(state.text(), "abcdé");
    }

    #[test]
    fn with_max_chars_truncates_prefill() {
        let state = TextInputState::new("abcdef".to_string()).with_max_chars(4);
        assert_eq!(state.text(), "abcd");
        assert_eq!(state.cursor_position(), (0, 4));
    }

    #[test]
    fn delete_backward_handles_multibyte_text() {
        let mut state = TextInputState::new("a😄".to_string());
        state.delete_backward();
        assert_eq!(state.text(), "a");
        state.delete_backward();
        state.delete_backward();
        assert_eq!(state.text(), "");
    }

    #[test]
    fn vertical_movement_keeps_column() {
        let mut state = TextInputState::new("abcdef\nxy\nlonger".to_string());
        state.move_up();
        assert_eq!(state.cursor_position(), (1, 2));
        state.move_up();
        assert_eq!(state.cursor_position(), (0, 2));
        state.move_down();
        state.move_down();
        assert_eq!(state.cursor_position(), (2, 2));
        state.move_down();
        assert_eq!(state.cursor_position(), (2, 6));
    }

    #[test]
    fn newline_splits_line_at_cursor() {
        let mut state = TextInputState::new("catdog".to_string());
        state.move_left();
        state.move_left();
        state.move_left();
        state.insert_newline();
        assert_eq!(state.text(), "cat\ndog");
        assert_eq!(state.cursor_position(), (1, 0));
    }

    #[test]
    fn delete_word_backward_removes_previous_word() {
        let mut state = TextInputState::new("hello world".to_string());
        state.delete_word_backward();
        assert_eq!(state.text(), "hello ");
        assert_eq!(state.cursor_position(), (0, 6));
    }

    #[test]
    fn delete_to_line_start_only_touches_current_line() {
        let mut state = TextInputState::new("cat\ndog".to_string());
        state.delete_to_line_start();
        assert_eq!(state.text(), "cat\n");
    }
}
