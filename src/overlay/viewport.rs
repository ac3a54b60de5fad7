use std::time::{Duration, Instant};

use regex_search_engine::ScrollBehavior;

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f32,
    to: f32,
    started: Instant,
}

/// Vertical scroll state of the document pane, in rows.
#[derive(Debug, Clone)]
pub struct Viewport {
    offset: f32,
    height: usize,
    content_rows: usize,
    duration: Duration,
    animation: Option<Animation>,
}

impl Viewport {
    pub fn new(content_rows: usize, duration: Duration) -> Self {
        Self {
            offset: 0.0,
            height: 0,
            content_rows,
            duration,
            animation: None,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset.round().max(0.0) as usize
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.offset = self.clamp(self.offset);
    }

    fn max_offset(&self) -> f32 {
        self.content_rows.saturating_sub(self.height) as f32
    }

    fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.max_offset())
    }

    /// Puts the middle of `row` at the middle of the pane.
    pub fn center_on(&mut self, row: usize, behavior: ScrollBehavior, now: Instant) {
        let target = self.clamp(row as f32 + 0.5 - self.height as f32 / 2.0);
        match behavior {
            ScrollBehavior::Smooth if !self.duration.is_zero() => {
                self.animation = Some(Animation {
                    from: self.offset,
                    to: target,
                    started: now,
                });
            }
            _ => {
                self.animation = None;
                self.offset = target;
            }
        }
    }

    pub fn scroll_by(&mut self, rows: isize) {
        self.animation = None;
        self.offset = self.clamp(self.offset.round() + rows as f32);
    }

    /// Advances a running animation. Returns whether one is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        let elapsed = now.saturating_duration_since(animation.started);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.offset = animation.from + (animation.to - animation.from) * eased;
        if t >= 1.0 {
            self.offset = animation.to;
            self.animation = None;
        }
        self.animation.is_some()
    }
}
