use crate::state::{AppState, ViewPhase};
use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Footer component: keybinding hints and the current position.
pub struct Footer<'a> {
    state: &'a AppState,
}

impl<'a> Footer<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Render the footer to the given frame
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut spans: Vec<Span<'_>> = Vec::new();
        for (i, hint) in self.hints().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Theme::muted()));
            }
            spans.push(Span::styled(hint, Theme::muted()));
        }

        if let Some(position) = self.position() {
            spans.push(Span::styled("  \u{2502}  ", Theme::border()));
            spans.push(Span::styled(position, Theme::muted()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Keybinding hints for the current mode.
    fn hints(&self) -> Vec<&'static str> {
        if matches!(self.state.phase, ViewPhase::Loading { .. }) {
            return vec!["[q] quit"];
        }

        if self.state.search.active {
            return vec!["[Enter] keep filter", "[Esc] clear", "type to search"];
        }

        let mut hints = vec!["[\u{2191}\u{2193}] scroll", "[g/G] top/bottom", "[n/p] day", "[/] search", "[r] reload", "[q] quit"];
        if self.state.is_filtering() {
            hints.insert(0, "[Esc] clear filter");
        }
        hints
    }

    /// `item/total` position indicator, when messages are on screen.
    fn position(&self) -> Option<String> {
        if self.state.visible_len() == 0 {
            return None;
        }
        Some(format!("{}/{}", self.state.top_index() + 1, self.state.visible_len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlens_core::{Config, Message, ParseOutcome, calculate_stats};
    use chrono::NaiveDateTime;

    fn loaded_state() -> AppState {
        let mut state = AppState::new(&Config::default(), "chat.txt");
        state.set_viewport_rows(10);
        let messages: Vec<Message> = (0..4)
            .map(|i| Message {
                id: i,
                date: "2024/3/7".to_string(),
                time: "9:00:00 AM".to_string(),
                sender: "Alice".to_string(),
                content: format!("message {i}"),
                timestamp: NaiveDateTime::default(),
            })
            .collect();
        let stats = calculate_stats(&messages, 1);
        let generation = state.begin_load();
        state.apply_outcome(
            generation,
            Ok(ParseOutcome { messages, stats, current_user: "Alice".to_string() }),
        );
        state
    }

    #[test]
    fn test_hints_normal_mode() {
        let state = loaded_state();
        let hints = Footer::new(&state).hints();

        assert!(hints.iter().any(|h| h.contains("[/] search")));
        assert!(hints.iter().any(|h| h.contains("[q] quit")));
        assert!(!hints.iter().any(|h| h.contains("clear filter")));
    }

    #[test]
    fn test_hints_search_mode() {
        let mut state = loaded_state();
        state.open_search();
        let hints = Footer::new(&state).hints();

        assert!(hints.iter().any(|h| h.contains("[Enter]")));
        assert!(hints.iter().any(|h| h.contains("[Esc]")));
    }

    #[test]
    fn test_hints_show_clear_when_filtering() {
        let mut state = loaded_state();
        state.open_search();
        state.search_push('m');
        state.close_search();

        let hints = Footer::new(&state).hints();
        assert!(hints.iter().any(|h| h.contains("clear filter")));
    }

    #[test]
    fn test_hints_while_loading() {
        let mut state = loaded_state();
        state.begin_load();
        assert_eq!(Footer::new(&state).hints(), vec!["[q] quit"]);
    }

    #[test]
    fn test_position_indicator() {
        let mut state = loaded_state();
        assert_eq!(Footer::new(&state).position(), Some("1/4".to_string()));

        state.scroll_by(7);
        assert_eq!(Footer::new(&state).position(), Some("2/4".to_string()));
    }

    #[test]
    fn test_position_hidden_when_empty() {
        let mut state = loaded_state();
        state.open_search();
        for c in "zzz".chars() {
            state.search_push(c);
        }
        assert_eq!(Footer::new(&state).position(), None);
    }
}
