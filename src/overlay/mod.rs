use crate::config::AppConfig;
use crate::text_input::TextInputState;
use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use regex_search_engine::{
    Activation, Direction, Document, HighlightRegistry, MatchSpan, Navigator, ScrollBehavior,
    Surface,
};
use regex_search_history::SiteRecorder;
use std::{
    io::stdout,
    time::{Duration, Instant},
};

mod interaction;
mod layout;
mod render;
mod viewport;

use layout::{DocumentLayout, Line};
use viewport::Viewport;

/// The pattern box keeps at most this many characters.
const INPUT_MAX_CHARS: usize = 500;
const POPUP_WIDTH: u16 = 44;
const POPUP_INPUT_ROWS: u16 = 3;
const POPUP_MARGIN: u16 = 1;
const PAGE_SCROLL_ROWS: isize = 10;
const IDLE_POLL_MS: u64 = 100;
const ANIMATION_POLL_MS: u64 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Focus {
    Input,
    Document,
}

/// Everything the navigator paints on, plus where it scrolls.
struct Canvas {
    highlights: HighlightRegistry,
    layout: DocumentLayout,
    viewport: Viewport,
}

impl Surface for Canvas {
    fn set_all(&mut self, spans: &[MatchSpan]) {
        self.highlights.set_all(spans);
    }

    fn set_current(&mut self, span: &MatchSpan) {
        self.highlights.set_current(span);
    }

    fn clear(&mut self) {
        self.highlights.clear();
    }

    fn scroll_to_center(&mut self, span: &MatchSpan, behavior: ScrollBehavior) {
        match self.layout.row_of(span) {
            Some(row) => self.viewport.center_on(row, behavior, Instant::now()),
            None => log::debug!("match in node {} has no visible row", span.node),
        }
    }
}

pub struct Overlay {
    document: Document,
    host: String,
    navigator: Navigator,
    canvas: Canvas,
    input: TextInputState,
    focus: Focus,
    should_close: bool,
    _activation: Activation,
}

impl Overlay {
    /// `None` when an overlay is already open in this process.
    pub fn open(
        document: Document,
        host: impl Into<String>,
        config: &AppConfig,
        recorder: Option<SiteRecorder>,
        prefill: Option<String>,
    ) -> Option<Self> {
        let activation = Activation::acquire()?;
        let host = host.into();

        let mut navigator =
            Navigator::new(config.search_config()).with_scroll_behavior(config.scroll_behavior());
        if let Some(recorder) = recorder {
            navigator = navigator.with_recorder(move |raw: &str| recorder.record(raw));
        }

        let layout = DocumentLayout::new(&document);
        let viewport = Viewport::new(
            layout.len(),
            Duration::from_millis(config.scroll_duration_ms),
        );
        let input =
            TextInputState::new(prefill.unwrap_or_default()).with_max_chars(INPUT_MAX_CHARS);

        log::info!("overlay opened for {} ({} text nodes)", host, document.len());
        Some(Self {
            document,
            host,
            navigator,
            canvas: Canvas {
                highlights: HighlightRegistry::new(),
                layout,
                viewport,
            },
            input,
            focus: Focus::Input,
            should_close: false,
            _activation: activation,
        })
    }

    pub fn search(&mut self) {
        let status = self
            .navigator
            .search(self.input.text(), &self.document, &mut self.canvas);
        log::debug!("search on {}: {:?}", self.host, status);
    }

    pub fn step(&mut self, direction: Direction) {
        self.navigator.step(direction, &mut self.canvas);
    }

    pub fn close(&mut self) {
        self.navigator.close(&mut self.canvas);
        self.should_close = true;
        log::info!("overlay closed for {}", self.host);
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    pub fn status_text(&self) -> String {
        self.navigator.status().to_string()
    }

    fn tick(&mut self) -> bool {
        self.canvas.viewport.tick(Instant::now())
    }
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        stdout()
            .execute(EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

pub fn run(mut overlay: Overlay) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    loop {
        let animating = overlay.tick();
        terminal.draw(|f| overlay.render(f))?;

        let poll = if animating {
            ANIMATION_POLL_MS
        } else {
            IDLE_POLL_MS
        };
        if event::poll(Duration::from_millis(poll))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    overlay.handle_key(key);
                }
            }
        }

        if overlay.should_close() {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex_search_engine::{ALL_LAYER, Element};
    use std::sync::{Mutex, MutexGuard};

    // Overlays share one process-wide activation.
    static SERIAL: Mutex<()> = Mutex::new(());

    pub(super) fn serial() -> MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(super) fn open(texts: &[&str], prefill: &str) -> Overlay {
        let mut body = Element::new("body");
        for text in texts {
            body = body.child(Element::new("p").text(*text));
        }
        let config = AppConfig {
            smooth_scroll: false,
            ..AppConfig::default()
        };
        Overlay::open(
            Document::new(body.into()),
            "example.com",
            &config,
            None,
            Some(prefill.to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_second_open_is_refused() {
        let _serial = serial();
        let first = open(&["A cat"], "");
        assert!(Activation::is_active());
        let config = AppConfig::default();
        let second = Overlay::open(Document::from_plain_text("x"), "a.com", &config, None, None);
        assert!(second.is_none());
        drop(first);
        assert!(!Activation::is_active());
    }

    #[test]
    fn test_search_uses_prefilled_input() {
        let _serial = serial();
        let mut overlay = open(&["A cat sat on a dog mat"], "cat\ndog");
        assert_eq!(overlay.input.text(), "cat\ndog");
        overlay.search();
        assert_eq!(overlay.status_text(), "1 / 2");
        assert_eq!(overlay.canvas.highlights.layer(ALL_LAYER).len(), 2);

        overlay.step(Direction::Next);
        assert_eq!(overlay.status_text(), "2 / 2");
        overlay.step(Direction::Next);
        assert_eq!(overlay.status_text(), "1 / 2");
    }

    #[test]
    fn test_current_match_is_scrolled_into_view() {
        let _serial = serial();
        let texts: Vec<String> = (0..40).map(|i| format!("line {}", i)).collect();
        let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
        let mut overlay = open(&texts, "line 30");
        overlay.canvas.viewport.set_height(10);
        overlay.search();
        // Row 60 (one gap row between paragraphs), centered in ten rows.
        assert_eq!(overlay.canvas.viewport.offset(), 56);
    }

    #[test]
    fn test_close_clears_highlights() {
        let _serial = serial();
        let mut overlay = open(&["A cat"], "cat");
        overlay.search();
        assert!(!overlay.canvas.highlights.is_clear());
        overlay.close();
        assert!(overlay.should_close());
        assert!(overlay.canvas.highlights.is_clear());
        assert_eq!(overlay.status_text(), "");
    }
}
