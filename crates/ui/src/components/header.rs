use crate::components::format_count;
use crate::state::AppState;
use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Header component: title line plus the search/filter line.
pub struct Header<'a> {
    state: &'a AppState,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Render the header to the given frame
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(vec![self.title_line(), self.search_line()]).style(Theme::base());
        frame.render_widget(paragraph, area);
    }

    fn title_line(&self) -> Line<'a> {
        let mut spans = vec![
            Span::styled("chatlens", Style::default().fg(Theme::HIGHLIGHT).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(self.state.file_name.as_str(), Style::default().fg(Theme::FG)),
        ];

        if !self.state.messages.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{} messages", format_count(self.state.messages.len())),
                Theme::muted(),
            ));
        }

        Line::from(spans)
    }

    /// The second header line: live input, match summary, or hint.
    fn search_line(&self) -> Line<'a> {
        if self.state.search.active {
            return Line::from(vec![
                Span::styled("/", Theme::highlight()),
                Span::raw(self.state.search.query.clone()),
                Span::styled("\u{2588}", Theme::highlight()),
            ]);
        }

        if self.state.is_filtering() {
            return Line::from(Span::styled(
                format!(
                    "{} of {} messages match \"{}\"",
                    format_count(self.state.visible_len()),
                    format_count(self.state.messages.len()),
                    self.state.search.query
                ),
                Theme::highlight(),
            ));
        }

        Line::from(Span::styled("press / to search", Theme::muted()))
    }
}
