use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout breakpoints for responsive TUI
///
/// Based on terminal height, the stats band collapses on short terminals so
/// the message list keeps a usable viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Header, stats band, list, footer
    Full,
    /// Stats band hidden (short terminals)
    Compact,
}

impl From<u16> for LayoutMode {
    fn from(height: u16) -> Self {
        if height >= 16 { Self::Full } else { Self::Compact }
    }
}

impl LayoutMode {
    /// Check if the stats band should be shown
    pub fn has_stats(&self) -> bool {
        matches!(self, Self::Full)
    }
}

/// Calculated layout for the TUI
#[derive(Debug, Clone)]
pub struct TuiLayout {
    /// Layout mode based on terminal height
    pub mode: LayoutMode,
    /// Header area (2 lines: title + search line)
    pub header: Rect,
    /// Stats band (only in Full mode with stats available)
    pub stats: Option<Rect>,
    /// Main message list area
    pub list: Rect,
    /// Footer area (1 line)
    pub footer: Rect,
}

impl TuiLayout {
    /// Calculate layout based on terminal size and stats availability
    pub fn calculate(area: Rect, stats_available: bool) -> Self {
        let mode = LayoutMode::from(area.height);
        let show_stats = stats_available && mode.has_stats();
        let stats_height = if show_stats { 3 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(stats_height),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            mode,
            header: chunks[0],
            stats: if show_stats { Some(chunks[1]) } else { None },
            list: chunks[2],
            footer: chunks[3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_mode_from_height() {
        assert_eq!(LayoutMode::from(40), LayoutMode::Full);
        assert_eq!(LayoutMode::from(16), LayoutMode::Full);
        assert_eq!(LayoutMode::from(15), LayoutMode::Compact);
        assert_eq!(LayoutMode::from(5), LayoutMode::Compact);
    }

    #[test]
    fn test_full_layout_bands() {
        let area = Rect::new(0, 0, 80, 30);
        let layout = TuiLayout::calculate(area, true);

        assert_eq!(layout.header.height, 2);
        assert_eq!(layout.stats.map(|r| r.height), Some(3));
        assert_eq!(layout.footer.height, 1);
        assert_eq!(layout.list.height, 30 - 2 - 3 - 1);
    }

    #[test]
    fn test_stats_hidden_without_data() {
        let area = Rect::new(0, 0, 80, 30);
        let layout = TuiLayout::calculate(area, false);

        assert!(layout.stats.is_none());
        assert_eq!(layout.list.height, 30 - 2 - 1);
    }

    #[test]
    fn test_compact_layout_drops_stats() {
        let area = Rect::new(0, 0, 80, 12);
        let layout = TuiLayout::calculate(area, true);

        assert!(layout.stats.is_none());
        assert!(layout.list.height >= 1);
    }
}
