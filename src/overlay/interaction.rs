use super::*;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

impl Overlay {
    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Esc => return self.close(),
            KeyCode::Char('s') if ctrl => return self.search(),
            KeyCode::Enter if ctrl => return self.search(),
            KeyCode::F(3) if shift => return self.step(Direction::Previous),
            KeyCode::F(15) => return self.step(Direction::Previous),
            KeyCode::F(3) => return self.step(Direction::Next),
            KeyCode::Char('n') if ctrl => return self.step(Direction::Next),
            KeyCode::Char('p') if ctrl => return self.step(Direction::Previous),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Input => Focus::Document,
                    Focus::Document => Focus::Input,
                };
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key.code, ctrl),
            Focus::Document => self.handle_document_key(key.code),
        }
    }

    fn handle_input_key(&mut self, code: KeyCode, ctrl: bool) {
        match code {
            KeyCode::Char('a') if ctrl => self.input.move_to_line_start(),
            KeyCode::Char('e') if ctrl => self.input.move_to_line_end(),
            KeyCode::Char('u') if ctrl => self.input.delete_to_line_start(),
            KeyCode::Char('w') if ctrl => self.input.delete_word_backward(),
            KeyCode::Char('l') if ctrl => self.input.clear(),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(ch) => {
                let mut buf = [0; 4];
                self.input.insert(ch.encode_utf8(&mut buf));
            }
            KeyCode::Enter => self.input.insert_newline(),
            KeyCode::Backspace => self.input.delete_backward(),
            KeyCode::Delete => self.input.delete_forward(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Up => self.input.move_up(),
            KeyCode::Down => self.input.move_down(),
            KeyCode::Home => self.input.move_to_line_start(),
            KeyCode::End => self.input.move_to_line_end(),
            _ => {}
        }
    }

    fn handle_document_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Enter => self.step(Direction::Next),
            KeyCode::Up | KeyCode::Char('k') => self.step(Direction::Previous),
            KeyCode::PageDown => self.canvas.viewport.scroll_by(PAGE_SCROLL_ROWS),
            KeyCode::PageUp => self.canvas.viewport.scroll_by(-PAGE_SCROLL_ROWS),
            KeyCode::Char('/') => self.focus = Focus::Input,
            _ => {}
        }
    }
}
