use ratatui::style::{Color, Modifier, Style};

/// Color theme for the application
pub struct Theme;

fn fg(color: Color) -> Style {
    Style::new().fg(color)
}

fn bold(color: Color) -> Style {
    fg(color).add_modifier(Modifier::BOLD)
}

impl Theme {
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Cyan;
    pub const HIGHLIGHT: Color = Color::Yellow;
    pub const HEALTHY: Color = Color::Green;
    pub const FAILED: Color = Color::Red;
    pub const BAR_BG: Color = Color::DarkGray;

    pub fn border() -> Style {
        fg(Self::FG_DIM)
    }

    pub fn border_focused() -> Style {
        fg(Self::ACCENT)
    }

    pub fn title() -> Style {
        bold(Self::ACCENT)
    }

    pub fn text() -> Style {
        fg(Self::FG)
    }

    pub fn text_dim() -> Style {
        fg(Self::FG_DIM)
    }

    /// Field names in the detail pane
    pub fn label() -> Style {
        fg(Self::HIGHLIGHT)
    }

    /// Field values in the detail pane
    pub fn value() -> Style {
        bold(Self::FG)
    }

    pub fn list_item() -> Style {
        Self::text()
    }

    pub fn list_item_selected() -> Style {
        bold(Color::Black).bg(Self::ACCENT)
    }

    /// Row of the kubeconfig's current context
    pub fn list_item_current() -> Style {
        bold(Self::HEALTHY)
    }

    pub fn list_item_failed() -> Style {
        fg(Self::FAILED)
    }

    pub fn status_bar() -> Style {
        fg(Self::FG_DIM).bg(Self::BAR_BG)
    }

    pub fn status_bar_key() -> Style {
        bold(Self::HIGHLIGHT).bg(Self::BAR_BG)
    }

    pub fn collecting() -> Style {
        fg(Self::HIGHLIGHT)
    }

    pub fn error() -> Style {
        bold(Self::FAILED)
    }
}
