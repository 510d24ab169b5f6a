use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

/// Color theme for the chatlens TUI
///
/// Dark, chat-oriented palette: outgoing messages get the accent bubble
/// color, incoming senders get a stable per-sender color.
#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    /// Primary background (fills terminal)
    pub const BG: Color = Color::Rgb(17, 21, 24);

    /// Foreground: primary text
    pub const FG: Color = Color::Rgb(209, 213, 219);

    /// Muted text: timestamps, hints
    pub const MUTED: Color = Color::Rgb(110, 118, 129);

    /// Outgoing (current user) accent
    pub const OUTGOING: Color = Color::Rgb(99, 185, 117);

    /// Highlight for search state and selections
    pub const HIGHLIGHT: Color = Color::Rgb(224, 192, 112);

    /// Errors
    pub const RED: Color = Color::Rgb(226, 120, 120);

    /// Border color
    pub const BORDER: Color = Color::Rgb(58, 64, 78);

    /// Stable per-sender colors, picked by `sender_color`
    pub const SENDER_PALETTE: [Color; 8] = [
        Color::Rgb(132, 160, 198),
        Color::Rgb(160, 147, 199),
        Color::Rgb(226, 164, 120),
        Color::Rgb(214, 138, 168),
        Color::Rgb(121, 162, 199),
        Color::Rgb(226, 120, 120),
        Color::Rgb(118, 185, 176),
        Color::Rgb(137, 184, 194),
    ];

    /// Base style for all text
    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    /// Muted style (timestamps, secondary text)
    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED)
    }

    /// Error style
    pub fn error() -> Style {
        Style::default().fg(Self::RED)
    }

    /// Border style
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Search/highlight style
    pub fn highlight() -> Style {
        Style::default().fg(Self::HIGHLIGHT)
    }

    /// Color for a sender's name and avatar initial.
    ///
    /// Pure function of the name: the same sender always maps to the same
    /// palette entry, independent of encounter order.
    pub fn sender_color(sender: &str) -> Color {
        let mut hash: i32 = 0;
        for c in sender.chars() {
            hash = (c as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
        }
        Self::SENDER_PALETTE[hash.unsigned_abs() as usize % Self::SENDER_PALETTE.len()]
    }

    /// Styled span for a sender name, bold in their stable color.
    pub fn sender_span(sender: &str, outgoing: bool) -> Span<'_> {
        let color = if outgoing { Self::OUTGOING } else { Self::sender_color(sender) };
        Span::styled(sender, Style::default().fg(color).add_modifier(Modifier::BOLD))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_color_is_stable() {
        assert_eq!(Theme::sender_color("Alice"), Theme::sender_color("Alice"));
        assert_eq!(Theme::sender_color(""), Theme::sender_color(""));
    }

    #[test]
    fn test_sender_color_comes_from_palette() {
        for name in ["Alice", "Bob", "Carol", "長い名前", "🙂"] {
            let color = Theme::sender_color(name);
            assert!(Theme::SENDER_PALETTE.contains(&color));
        }
    }

    #[test]
    fn test_sender_span_outgoing_uses_accent() {
        let span = Theme::sender_span("Alice", true);
        assert_eq!(span.style.fg, Some(Theme::OUTGOING));

        let span = Theme::sender_span("Alice", false);
        assert_eq!(span.style.fg, Some(Theme::sender_color("Alice")));
    }
}
