use crate::components::format_count;
use crate::theme::Theme;

use chatlens_core::ChatStats;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// One-line summary band of the aggregate statistics.
pub struct StatsBar<'a> {
    stats: &'a ChatStats,
}

impl<'a> StatsBar<'a> {
    pub fn new(stats: &'a ChatStats) -> Self {
        Self { stats }
    }

    /// Render the stats band to the given frame
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(Line::from(self.summary_spans()))
            .block(Block::default().borders(Borders::ALL).border_style(Theme::border()));
        frame.render_widget(paragraph, area);
    }

    fn summary_spans(&self) -> Vec<Span<'a>> {
        let mut spans = vec![
            Span::raw(" "),
            Span::raw(format_count(self.stats.total_messages)),
            Span::styled(" messages", Theme::muted()),
            Span::styled("  \u{2502}  ", Theme::border()),
            Span::raw(self.stats.participants.to_string()),
            Span::styled(" participants", Theme::muted()),
            Span::styled("  \u{2502}  ", Theme::border()),
            Span::raw(format_count(self.stats.avg_messages_per_day as usize)),
            Span::styled(" msgs/day", Theme::muted()),
            Span::styled("  \u{2502}  ", Theme::border()),
            Span::raw(self.stats.duration_days.to_string()),
            Span::styled(" days", Theme::muted()),
        ];

        if !self.stats.date_range.start.is_empty() {
            spans.push(Span::styled("  \u{2502}  ", Theme::border()));
            spans.push(Span::styled(
                format!("{} \u{2192} {}", self.stats.date_range.start, self.stats.date_range.end),
                Theme::muted(),
            ));
        }

        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlens_core::DateRange;

    fn sample_stats() -> ChatStats {
        ChatStats {
            total_messages: 1234,
            participants: 2,
            date_range: DateRange { start: "2024/3/7".to_string(), end: "2024/4/20".to_string() },
            avg_messages_per_day: 28,
            duration_days: 44,
        }
    }

    fn spans_text(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_summary_contains_all_stats() {
        let stats = sample_stats();
        let text = spans_text(&StatsBar::new(&stats).summary_spans());

        assert!(text.contains("1,234 messages"));
        assert!(text.contains("2 participants"));
        assert!(text.contains("28 msgs/day"));
        assert!(text.contains("44 days"));
        assert!(text.contains("2024/3/7 \u{2192} 2024/4/20"));
    }

    #[test]
    fn test_summary_without_date_range() {
        let stats = ChatStats::default();
        let text = spans_text(&StatsBar::new(&stats).summary_spans());

        assert!(text.contains("0 messages"));
        assert!(!text.contains("\u{2192}"));
    }
}
