use crate::state::AppState;
use crate::theme::Theme;

use chatlens_core::Message;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Virtualized message list.
///
/// Only the window controller's visible range is turned into render lines;
/// the slice that actually fits the viewport is cut out of those lines by
/// the scroll offset. Every card occupies exactly `row_extent` rows, which
/// keeps the index math of the window controller exact.
pub struct MessageList<'a> {
    state: &'a AppState,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Render the visible window of the message list
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        if self.state.visible_len() == 0 {
            let text = if self.state.is_filtering() {
                "No messages found\n\nTry a different search term"
            } else {
                "No messages found in the loaded file\n\nPlease check if the file format is correct"
            };
            let empty = Paragraph::new(text).alignment(Alignment::Center).style(Theme::muted());
            frame.render_widget(empty, area);
            return;
        }

        let range = self.state.visible_range();
        let row_extent = self.state.row_extent();
        let width = area.width.saturating_sub(2) as usize;

        let mut lines: Vec<Line<'_>> = Vec::with_capacity(range.len() * row_extent);
        for position in range.start..range.end {
            if let Some(message) = self.state.message_at(position) {
                card_lines(&mut lines, message, &self.state.current_user, row_extent, width);
            }
        }

        let skip = self.state.scroll_offset().saturating_sub(range.start * row_extent);
        let visible: Vec<Line<'_>> = lines.into_iter().skip(skip).take(area.height as usize).collect();

        frame.render_widget(Paragraph::new(visible).style(Theme::base()), area);
    }
}

/// Append exactly `row_extent` lines for one message card.
///
/// Layout: a sender/time header line, up to `row_extent - 2` wrapped body
/// lines (the last one gets an ellipsis when the body is cut off), then
/// blank padding up to the fixed extent. Outgoing messages are right-aligned.
fn card_lines<'a>(out: &mut Vec<Line<'a>>, message: &'a Message, current_user: &str, row_extent: usize, width: usize) {
    let outgoing = !current_user.is_empty() && message.sender == current_user;
    let alignment = if outgoing { Alignment::Right } else { Alignment::Left };

    out.push(
        Line::from(vec![
            Theme::sender_span(&message.sender, outgoing),
            Span::raw("  "),
            Span::styled(message.time.as_str(), Theme::muted()),
            Span::raw("  "),
            Span::styled(message.date.as_str(), Theme::muted()),
        ])
        .alignment(alignment),
    );

    let body_rows = row_extent.saturating_sub(2);
    // Bubbles take at most 80% of the row, like a chat column.
    let bubble_width = (width * 4 / 5).max(8);
    // Wrap line by line so the source's own breaks survive.
    let wrapped: Vec<String> = message
        .content
        .lines()
        .flat_map(|line| textwrap::wrap(line, bubble_width))
        .map(|row| row.into_owned())
        .collect();

    let mut produced = 1;
    for (i, row) in wrapped.iter().take(body_rows).enumerate() {
        let mut text = row.clone();
        if i + 1 == body_rows && wrapped.len() > body_rows {
            text.push('\u{2026}');
        }
        out.push(Line::from(Span::styled(text, Style::default().fg(Theme::FG))).alignment(alignment));
        produced += 1;
    }

    while produced < row_extent {
        out.push(Line::default());
        produced += 1;
    }
}
