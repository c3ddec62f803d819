use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Widget,
};

use crate::ui::Theme;

/// Bottom line: key hints (or an error in their place) and a right-aligned note
#[derive(Default)]
pub struct StatusBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
    right_text: Option<String>,
    error: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyboard hints as (key, description) pairs
    pub fn hints<I>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.hints = hints.into_iter().collect();
        self
    }

    pub fn right<S: Into<String>>(mut self, text: S) -> Self {
        self.right_text = Some(text.into());
        self
    }

    /// Show an error instead of the hints
    pub fn error(mut self, message: Option<&'a str>) -> Self {
        self.error = message;
        self
    }

    fn left_line(&self) -> Line<'a> {
        if let Some(message) = self.error {
            return Line::from(vec![
                Span::styled(format!("Error: {}", message), Theme::error()),
                Span::styled("  [x] dismiss", Theme::status_bar()),
            ]);
        }

        let spans = self.hints.iter().enumerate().flat_map(|(i, (key, desc))| {
            let gap = if i == 0 { "" } else { "  " };
            [
                Span::styled(gap, Theme::status_bar()),
                Span::styled(format!("[{}]", key), Theme::status_bar_key()),
                Span::styled(format!(" {}", desc), Theme::status_bar()),
            ]
        });
        Line::from(spans.collect::<Vec<_>>())
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::status_bar());
        let inner = Rect {
            x: area.x + 1,
            width: area.width.saturating_sub(2),
            ..area
        };

        let left = self.left_line();
        let left_width = left.width();
        left.render(inner, buf);

        // Dropped when it would overlap the left side
        if let Some(right) = self.right_text {
            if left_width + right.len() + 2 <= inner.width as usize {
                Line::styled(right, Theme::status_bar())
                    .alignment(Alignment::Right)
                    .render(inner, buf);
            }
        }
    }
}

/// Default hints for list navigation screens
pub fn list_nav_hints() -> Vec<(&'static str, &'static str)> {
    vec![
        ("↑/k", "Up"),
        ("↓/j", "Down"),
        ("Enter", "Pools"),
        ("r", "Refresh"),
        ("?", "Help"),
        ("q", "Quit"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(bar: StatusBar, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_hints_and_right_text() {
        let text = rendered(StatusBar::new().hints([("q", "Quit")]).right("2/3 clusters ok"), 60);

        assert!(text.starts_with(" [q] Quit"));
        assert!(text.trim_end().ends_with("2/3 clusters ok"));
    }

    #[test]
    fn test_right_text_dropped_when_narrow() {
        let text = rendered(StatusBar::new().hints([("q", "Quit")]).right("2/3 clusters ok"), 20);

        assert!(!text.contains("clusters"));
    }

    #[test]
    fn test_error_replaces_hints() {
        let text = rendered(
            StatusBar::new().hints([("q", "Quit")]).error(Some("kubeconfig missing")),
            60,
        );

        assert!(text.contains("Error: kubeconfig missing"));
        assert!(!text.contains("[q]"));
    }
}
