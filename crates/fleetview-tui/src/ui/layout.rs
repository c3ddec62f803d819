use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Layout helper for consistent screen layouts
pub struct Layout;

impl Layout {
    /// Width of the cluster list column
    pub const LIST_WIDTH: u16 = 36;

    /// Create the main layout with header, content, and status bar
    pub fn main(area: Rect) -> (Rect, Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2])
    }

    /// Split content into a list column and a detail pane
    pub fn list_detail(area: Rect) -> (Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(Self::LIST_WIDTH),
                Constraint::Min(1),
            ])
            .split(area);

        (chunks[0], chunks[1])
    }

    /// A rectangle centered in `area`, clamped to fit
    pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width.saturating_sub(4));
        let height = height.min(area.height.saturating_sub(4));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_layout_reserves_header_and_status() {
        let (header, content, status) = Layout::main(Rect::new(0, 0, 80, 24));

        assert_eq!(header.height, 3);
        assert_eq!(status.height, 1);
        assert_eq!(content.height, 20);
    }

    #[test]
    fn test_centered_fits_small_area() {
        let area = Rect::new(0, 0, 30, 10);
        let popup = Layout::centered(area, 50, 24);

        assert_eq!(popup.width, 26);
        assert_eq!(popup.height, 6);
        assert_eq!(popup.x, 2);
    }
}
