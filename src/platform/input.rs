//! Keyboard events to per-tick intent
//!
//! Direction keys are held state. Terminals with keyboard enhancement send
//! proper release events; classic terminals only repeat presses, so a key
//! also counts as released once no press or repeat arrived within the hold
//! window. Fire is a command: a press latches it until the next tick takes it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::TickInput;

/// Covers the gap between OS key-repeat events (at least ~15 Hz)
pub const HOLD_WINDOW: Duration = Duration::from_millis(150);

/// What a key does in game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Fire,
    Quit,
}

/// Key bindings: arrows or A/D to move, Space to fire, Q/Esc/Ctrl-C to quit
pub fn action_for(event: &KeyEvent) -> Option<Action> {
    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::Quit)
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::Right),
        KeyCode::Char(' ') => Some(Action::Fire),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Tracks held keys between ticks
#[derive(Debug, Clone)]
pub struct KeyTracker {
    /// Each held action mapped to the last time it was seen pressed
    held: HashMap<Action, Instant>,
    fire_latched: bool,
    hold_window: Duration,
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::with_hold_window(HOLD_WINDOW)
    }

    pub fn with_hold_window(hold_window: Duration) -> Self {
        Self {
            held: HashMap::new(),
            fire_latched: false,
            hold_window,
        }
    }

    /// Record a key event; returns the action it maps to, if any
    pub fn handle(&mut self, event: &KeyEvent, now: Instant) -> Option<Action> {
        let action = action_for(event)?;
        match event.kind {
            KeyEventKind::Press => {
                if action == Action::Fire {
                    self.fire_latched = true;
                }
                self.held.insert(action, now);
            }
            KeyEventKind::Repeat => {
                self.held.insert(action, now);
            }
            KeyEventKind::Release => {
                self.held.remove(&action);
            }
        }
        Some(action)
    }

    pub fn is_held(&self, action: Action, now: Instant) -> bool {
        self.held
            .get(&action)
            .is_some_and(|&seen| now.saturating_duration_since(seen) <= self.hold_window)
    }

    /// Intent for the next tick; consumes a latched fire command
    pub fn take_input(&mut self, now: Instant) -> TickInput {
        TickInput {
            move_left: self.is_held(Action::Left, now),
            move_right: self.is_held(Action::Right, now),
            fire: std::mem::take(&mut self.fire_latched),
        }
    }

    /// Forget everything (between sessions)
    pub fn clear(&mut self) {
        self.held.clear();
        self.fire_latched = false;
    }
}
