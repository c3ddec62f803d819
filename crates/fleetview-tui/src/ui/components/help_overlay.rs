use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::{Layout, Theme};

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let popup_area = Layout::centered(frame.area(), 44, 16);

        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled("Navigation", Theme::label())),
            Self::key_line("j/↓", "Next cluster or pool"),
            Self::key_line("k/↑", "Previous cluster or pool"),
            Self::key_line("Enter/l", "Show node pools"),
            Self::key_line("Esc/h", "Go back"),
            Line::from(""),
            Line::from(Span::styled("Actions", Theme::label())),
            Self::key_line("r", "Collect the fleet again"),
            Self::key_line("x", "Dismiss error"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_focused())
                .title(Span::styled(" Help ", Theme::title())),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>8}", key), Theme::list_item_current()),
            Span::styled(format!("  {}", desc), Theme::text()),
        ])
    }
}
