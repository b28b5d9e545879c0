//! Slider position and auto-advance state.
//!
//! The carousel never reads the clock itself; callers pass `now` so the TUI
//! tick and tests drive it the same way.

use std::time::{Duration, Instant};

use crate::config::CarouselConfig;

/// Slides visible at once.
pub const VISIBLE_SLIDES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Next,
    Prev,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    current: usize,
    paused: bool,
    last_interaction: Option<Instant>,
    last_advance: Instant,
    tick: Duration,
    idle_resume: Duration,
    swipe_threshold: i32,
    drag: Option<(i32, i32)>,
}

impl Carousel {
    pub fn new(len: usize, config: &CarouselConfig, now: Instant) -> Self {
        Self {
            len,
            current: 0,
            paused: false,
            last_interaction: None,
            last_advance: now,
            tick: config.tick(),
            idle_resume: config.idle_resume(),
            swipe_threshold: config.swipe_threshold.abs(),
            drag: None,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Replace the slide count, keeping the position when still in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.current >= len {
            self.current = 0;
        }
    }

    /// Pause while the pointer hovers the slider.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn next(&mut self, now: Instant) {
        self.step_forward();
        self.touch(now);
    }

    pub fn prev(&mut self, now: Instant) {
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
        self.touch(now);
    }

    /// Jump to slide `index` (a dot indicator). Out-of-range indices wrap.
    pub fn go_to(&mut self, index: usize, now: Instant) {
        if self.len > 0 {
            self.current = index % self.len;
        }
        self.touch(now);
    }

    /// Advance when a tick interval has elapsed, unless paused or the user
    /// interacted recently. Returns whether the slide changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if self.len < 2 || self.paused {
            return false;
        }
        if let Some(at) = self.last_interaction {
            if now.saturating_duration_since(at) <= self.idle_resume {
                return false;
            }
        }
        if now.saturating_duration_since(self.last_advance) < self.tick {
            return false;
        }
        self.step_forward();
        self.last_advance = now;
        true
    }

    /// Indices of the visible window, starting at the current slide.
    pub fn visible(&self) -> Vec<usize> {
        (0..VISIBLE_SLIDES.min(self.len))
            .map(|i| (self.current + i) % self.len)
            .collect()
    }

    pub fn touch_start(&mut self, x: i32) {
        self.drag = Some((x, x));
    }

    pub fn touch_move(&mut self, x: i32) {
        if let Some((_, end)) = self.drag.as_mut() {
            *end = x;
        }
    }

    /// Finish a drag. A leftward drag past the threshold moves to the next
    /// slide, a rightward one to the previous.
    pub fn touch_end(&mut self, now: Instant) -> Option<Swipe> {
        let (start, end) = self.drag.take()?;
        let distance = start - end;
        let swipe = if distance >= self.swipe_threshold {
            Swipe::Next
        } else if distance <= -self.swipe_threshold {
            Swipe::Prev
        } else {
            return None;
        };
        match swipe {
            Swipe::Next => self.next(now),
            Swipe::Prev => self.prev(now),
        }
        Some(swipe)
    }

    fn step_forward(&mut self) {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
    }

    fn touch(&mut self, now: Instant) {
        self.last_interaction = Some(now);
        self.last_advance = now;
    }
}
