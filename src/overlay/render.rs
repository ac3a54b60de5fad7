use super::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

const ALL_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Rgb(255, 215, 0));
const CURRENT_STYLE: Style = Style::new()
    .fg(Color::White)
    .bg(Color::Rgb(255, 99, 71));
const HINT_STYLE: Style = Style::new().fg(Color::DarkGray);

impl Overlay {
    pub(super) fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        let document_area = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.host))
            .title_style(Style::default().bold());
        let inner = block.inner(document_area);
        self.canvas.viewport.set_height(inner.height as usize);

        let lines = self.visible_lines(inner.height as usize);
        f.render_widget(Paragraph::new(lines).block(block), document_area);

        self.render_popup(f, area);

        let help = Paragraph::new(
            " Ctrl-S: Search | F3/Ctrl-N: Next | Shift-F3/Ctrl-P: Prev | Tab: Focus | Esc: Close ",
        )
        .style(HINT_STYLE);
        let help_area = Rect {
            x: 0,
            y: area.height.saturating_sub(1),
            width: area.width,
            height: 1,
        };
        f.render_widget(help, help_area);
    }

    fn visible_lines(&self, height: usize) -> Vec<ratatui::text::Line<'static>> {
        let offset = self.canvas.viewport.offset();
        self.canvas
            .layout
            .lines()
            .iter()
            .skip(offset)
            .take(height)
            .map(|line| match *line {
                Line::Gap => ratatui::text::Line::default(),
                Line::Text { node, start, end } => self.styled_line(node, start, end),
            })
            .collect()
    }

    /// Splits one row into runs sharing a highlight state.
    fn styled_line(
        &self,
        node: usize,
        start: usize,
        end: usize,
    ) -> ratatui::text::Line<'static> {
        let Some(leaf) = self.document.leaf(node) else {
            return ratatui::text::Line::default();
        };
        let text = &leaf.text[start..end];
        let highlights = &self.canvas.highlights;

        let mut spans = Vec::new();
        let mut run = String::new();
        let mut run_style = Style::default();
        for (i, ch) in text.char_indices() {
            let offset = start + i;
            let style = if highlights.is_current(node, offset) {
                CURRENT_STYLE
            } else if highlights.is_any(node, offset) {
                ALL_STYLE
            } else {
                Style::default()
            };
            if style != run_style && !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), run_style));
            }
            run_style = style;
            run.push(ch);
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, run_style));
        }
        ratatui::text::Line::from(spans)
    }

    fn render_popup(&self, f: &mut Frame, area: Rect) {
        let width = POPUP_WIDTH.min(area.width.saturating_sub(POPUP_MARGIN * 2));
        let input_rows = (self.input.line_count() as u16).clamp(1, POPUP_INPUT_ROWS);
        // Borders, input rows, status row.
        let height = (input_rows + 3).min(area.height.saturating_sub(POPUP_MARGIN + 1));
        if width < 4 || height < 4 {
            return;
        }
        let popup = Rect {
            x: area.width.saturating_sub(width + POPUP_MARGIN),
            y: POPUP_MARGIN,
            width,
            height,
        };

        let border_style = if self.focus == Focus::Input {
            Style::default().fg(Color::Rgb(255, 215, 0))
        } else {
            HINT_STYLE
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(border_style)
            .title(" Regex ");
        let inner = block.inner(popup);
        f.render_widget(Clear, popup);
        f.render_widget(block, popup);

        let (cursor_line, cursor_col) = self.input.cursor_position();
        let visible_rows = inner.height.saturating_sub(1) as usize;
        let first_row = (cursor_line + 1).saturating_sub(visible_rows);
        let first_col = (cursor_col + 1).saturating_sub(inner.width as usize);

        let input_lines: Vec<ratatui::text::Line> = self
            .input
            .text()
            .split('\n')
            .skip(first_row)
            .take(visible_rows)
            .map(|line| {
                let visible: String = line.chars().skip(first_col).collect();
                ratatui::text::Line::raw(visible)
            })
            .collect();
        let input_area = Rect {
            height: visible_rows as u16,
            ..inner
        };
        f.render_widget(Paragraph::new(input_lines), input_area);

        let status_area = Rect {
            y: inner.y + inner.height.saturating_sub(1),
            height: 1,
            ..inner
        };
        let status_style = if self.navigator.error().is_some() {
            Style::default().fg(Color::Rgb(255, 99, 71))
        } else {
            HINT_STYLE
        };
        f.render_widget(
            Paragraph::new(self.status_text()).style(status_style),
            status_area,
        );

        if self.focus == Focus::Input {
            f.set_cursor_position((
                input_area.x + (cursor_col - first_col) as u16,
                input_area.y + (cursor_line - first_row) as u16,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{open, serial};
    use super::*;

    fn runs(line: &ratatui::text::Line) -> Vec<(String, Style)> {
        line.spans
            .iter()
            .map(|span| (span.content.to_string(), span.style))
            .collect()
    }

    #[test]
    fn test_row_is_split_into_highlight_runs() {
        let _serial = serial();
        let mut overlay = open(&["cat dog cat"], "cat");
        overlay.search();

        let line = overlay.styled_line(0, 0, 11);
        assert_eq!(
            runs(&line),
            vec![
                ("cat".to_string(), CURRENT_STYLE),
                (" dog ".to_string(), Style::default()),
                ("cat".to_string(), ALL_STYLE),
            ]
        );

        overlay.step(Direction::Next);
        let line = overlay.styled_line(0, 4, 11);
        assert_eq!(
            runs(&line),
            vec![
                ("dog ".to_string(), Style::default()),
                ("cat".to_string(), CURRENT_STYLE),
            ]
        );
    }
}
