use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;

use crate::app::Result;

pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
}

pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next(&self) -> Result<AppEvent> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Windows reports releases too.
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(AppEvent::Key(key));
                }
                Event::Mouse(mouse) => return Ok(AppEvent::Mouse(mouse)),
                _ => {}
            }
        }
        Ok(AppEvent::Tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    NextPane,
    PrevPane,
    Select,
    Back,
    NextLink,
    PrevLink,
    OpenInBrowser,
    Refresh,
    SlideNext,
    SlidePrev,
    ToggleSliderPause,
    None,
}
