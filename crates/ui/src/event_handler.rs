use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::Result;

use crate::state::{AppState, ViewPhase};

/// Event handler for the TUI application
pub struct EventHandler;

/// Actions the app loop reacts to beyond plain state mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Exit the viewer
    Quit,
    /// Re-read and re-parse the current file
    Reload,
    /// Scroll position changed; the visible range needs a refresh
    Scrolled,
    /// Search state changed
    SearchChanged,
}

impl EventHandler {
    /// Read a single event from the terminal
    pub fn read() -> Result<Option<Event>> {
        match crossterm::event::poll(std::time::Duration::from_millis(100)) {
            Ok(true) => Ok(Some(crossterm::event::read()?)),
            _ => Ok(None),
        }
    }

    /// Handle a keyboard event against the current state
    pub fn handle_key_event(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        // While loading, only quitting is meaningful.
        if matches!(state.phase, ViewPhase::Loading { .. }) {
            return Self::quit_key(event).then_some(KeyAction::Quit);
        }

        if state.search.active {
            Self::handle_search_key(event, state)
        } else {
            Self::handle_normal_key(event, state)
        }
    }

    fn quit_key(event: KeyEvent) -> bool {
        matches!(event.code, KeyCode::Char('q'))
            || (event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL))
    }

    /// Handle keys while the search input is capturing
    fn handle_search_key(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
        match event.code {
            KeyCode::Esc => {
                state.cancel_search();
                Some(KeyAction::SearchChanged)
            }
            KeyCode::Enter => {
                state.close_search();
                Some(KeyAction::SearchChanged)
            }
            KeyCode::Backspace => {
                state.search_pop();
                Some(KeyAction::SearchChanged)
            }
            KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => {
                state.search_push(c);
                Some(KeyAction::SearchChanged)
            }
            _ => None,
        }
    }

    /// Handle keys in normal browsing mode
    fn handle_normal_key(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
        if Self::quit_key(event) {
            return Some(KeyAction::Quit);
        }

        match event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                state.scroll_by(-1);
                Some(KeyAction::Scrolled)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                state.scroll_by(1);
                Some(KeyAction::Scrolled)
            }
            KeyCode::PageUp => {
                state.page_up();
                Some(KeyAction::Scrolled)
            }
            KeyCode::PageDown | KeyCode::Char(' ') => {
                state.page_down();
                Some(KeyAction::Scrolled)
            }
            KeyCode::Home | KeyCode::Char('g') => {
                state.jump_top();
                Some(KeyAction::Scrolled)
            }
            KeyCode::End | KeyCode::Char('G') => {
                state.jump_bottom();
                Some(KeyAction::Scrolled)
            }
            KeyCode::Char('n') => {
                state.jump_to_next_day();
                Some(KeyAction::Scrolled)
            }
            KeyCode::Char('p') => {
                state.jump_to_prev_day();
                Some(KeyAction::Scrolled)
            }
            KeyCode::Char('/') => {
                state.open_search();
                Some(KeyAction::SearchChanged)
            }
            KeyCode::Esc if state.is_filtering() => {
                state.cancel_search();
                Some(KeyAction::SearchChanged)
            }
            KeyCode::Char('r') => Some(KeyAction::Reload),
            _ => None,
        }
    }
}
