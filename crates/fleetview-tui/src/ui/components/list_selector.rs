use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget},
};

use crate::ui::Theme;

/// How a row should be styled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Normal,
    /// The kubeconfig's current context
    Current,
    Failed,
}

impl RowKind {
    fn style(self) -> Style {
        match self {
            RowKind::Normal => Theme::list_item(),
            RowKind::Current => Theme::list_item_current(),
            RowKind::Failed => Theme::list_item_failed(),
        }
    }

    fn decorate(self, text: String) -> String {
        match self {
            RowKind::Current => format!("{} *", text),
            _ => text,
        }
    }
}

/// Bordered, scrollable list with a highlighted row
pub struct ListSelector<'a> {
    rows: Vec<ListItem<'a>>,
    title: String,
}

impl ListSelector<'_> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            title: title.into(),
        }
    }

    /// Rows as (text, kind) pairs
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = (S, RowKind)>,
        S: Into<String>,
    {
        self.rows = items
            .into_iter()
            .map(|(text, kind)| ListItem::new(Span::styled(kind.decorate(text.into()), kind.style())))
            .collect();
        self
    }
}

impl StatefulWidget for ListSelector<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut ListState) {
        let list = List::new(self.rows)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border_focused())
                    .title(Span::styled(self.title, Theme::title())),
            )
            .highlight_style(Theme::list_item_selected())
            .highlight_symbol("▶ ");

        StatefulWidget::render(list, area, buf, state);
    }
}

pub trait ListSelectorExt {
    fn render_list_selector(&mut self, area: Rect, selector: ListSelector, state: &mut ListState);
}

impl ListSelectorExt for ratatui::Frame<'_> {
    fn render_list_selector(&mut self, area: Rect, selector: ListSelector, state: &mut ListState) {
        self.render_stateful_widget(selector, area, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_context_is_marked() {
        assert_eq!(RowKind::Current.decorate("prod".to_string()), "prod *");
        assert_eq!(RowKind::Failed.decorate("staging".to_string()), "staging");
    }
}
