use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Full-screen progress view shown while a transcript is parsing.
pub struct ProgressView<'a> {
    percent: u8,
    status: &'a str,
}

impl<'a> ProgressView<'a> {
    pub fn new(percent: u8, status: &'a str) -> Self {
        Self { percent: percent.min(100), status }
    }

    /// Render the progress view centered in the given area
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let card = centered_card(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(" Processing chat file ");
        let inner = block.inner(card);
        frame.render_widget(block, card);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let status = Paragraph::new(Line::from(self.status.to_string())).style(Theme::muted());
        frame.render_widget(status, rows[0]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Theme::OUTGOING).bg(Theme::BORDER))
            .percent(self.percent as u16)
            .label(format!("{}%", self.percent));
        frame.render_widget(gauge, rows[2]);
    }
}

/// A small card centered in the available area.
fn centered_card(area: Rect) -> Rect {
    let width = area.width.min(48);
    let height: u16 = 5;

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;

    Rect::new(x, y, width, height.min(area.height))
}
