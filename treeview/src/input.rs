//! Input events understood by the widget.

use std::time::{Duration, Instant};

use crate::activation::Activation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Release,
    WheelUp,
    WheelDown,
    Other,
}

/// Mouse event at absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub button: MouseButton,
    pub x: u16,
    pub y: u16,
}

impl MouseEvent {
    pub fn new(button: MouseButton, x: u16, y: u16) -> Self {
        Self { button, x, y }
    }

    pub fn left(x: u16, y: u16) -> Self {
        Self::new(MouseButton::Left, x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Enter,
    Space,
    Other,
}

impl Key {
    pub fn is_activate(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

/// What an input event ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// The event had no effect.
    Ignored,
    /// Suppressed as a repeat inside the debounce window.
    Debounced,
    Scrolled { offset: usize },
    SelectionMoved { id: String },
    Activated(Activation),
}

/// Drops events that repeat within a short window of the last accepted one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Accept the event at `now` unless it falls strictly inside the window.
    ///
    /// Rejected events do not extend the window.
    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last
            && now.saturating_duration_since(last) < self.window
        {
            return false;
        }
        self.last = Some(now);
        true
    }
}

impl From<crossterm::event::MouseEvent> for MouseEvent {
    fn from(event: crossterm::event::MouseEvent) -> Self {
        use crossterm::event::{MouseButton as CtButton, MouseEventKind};
        let button = match event.kind {
            MouseEventKind::Down(CtButton::Left) => MouseButton::Left,
            MouseEventKind::Up(_) => MouseButton::Release,
            MouseEventKind::ScrollUp => MouseButton::WheelUp,
            MouseEventKind::ScrollDown => MouseButton::WheelDown,
            _ => MouseButton::Other,
        };
        Self::new(button, event.column, event.row)
    }
}

impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode;
        match code {
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Enter => Key::Enter,
            KeyCode::Char(' ') => Key::Space,
            _ => Key::Other,
        }
    }
}

impl From<crossterm::event::KeyEvent> for Key {
    fn from(event: crossterm::event::KeyEvent) -> Self {
        if event.kind == crossterm::event::KeyEventKind::Release {
            return Key::Other;
        }
        event.code.into()
    }
}
