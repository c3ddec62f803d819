use fleetview_types::ClusterSummary;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    app::AppState,
    ui::{
        components::{ListSelector, ListSelectorExt, RowKind, StatusBar},
        Layout, Theme,
    },
};

/// Node pools of one cluster and the members of the highlighted pool
pub struct PoolDetailScreen;

impl PoolDetailScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, status_area) = Layout::main(frame.area());
        let (list_area, detail_area) = Layout::list_detail(content_area);
        let summary = state.selected_summary().unwrap_or_default();

        Self::render_header(frame, header_area, state);

        let items = summary
            .pools
            .iter()
            .map(|(pool, members)| (format!("{}  {}", pool, members.len()), RowKind::Normal));
        let selector = ListSelector::new(format!(" Pools ({}) ", state.pool_label)).items(items);
        frame.render_list_selector(list_area, selector, &mut state.ui_state.list_state);

        Self::render_members(frame, detail_area, &summary, state.ui_state.list_state.selected());
        Self::render_status_bar(frame, status_area, state, &summary);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let context = state.selected_context.as_deref().unwrap_or_default();
        let title = Line::from(vec![
            Span::styled("fleetview", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(context.to_string(), Theme::text()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled("Node Pools", Theme::text()),
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_members(
        frame: &mut Frame,
        area: Rect,
        summary: &ClusterSummary,
        selected: Option<usize>,
    ) {
        let pool = selected.and_then(|i| summary.pools.iter().nth(i));

        let (title, lines) = match pool {
            Some((name, members)) => (
                format!(" {} ", name),
                members
                    .iter()
                    .map(|node| Line::from(Span::styled(node.clone(), Theme::text())))
                    .collect(),
            ),
            None => (
                String::new(),
                vec![Line::from(Span::styled(
                    "No nodes carry the pool label",
                    Theme::text_dim(),
                ))],
            ),
        };

        let members = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(title, Theme::title())),
        );

        frame.render_widget(members, area);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, summary: &ClusterSummary) {
        let pooled: usize = summary.pools.values().map(|members| members.len()).sum();
        let right = format!("{}/{} nodes pooled", pooled, summary.total_nodes);

        let status = StatusBar::new()
            .hints([("↑/k", "Up"), ("↓/j", "Down"), ("Esc", "Back"), ("q", "Quit")])
            .right(right)
            .error(state.ui_state.error_message.as_deref());

        frame.render_widget(status, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fleetview_types::{ClusterInventory, ClusterOutcome, ClusterState, FleetSnapshot, NodeInfo};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_renders_members_of_selected_pool() {
        let nodes = vec![
            NodeInfo::new("blue-1".to_string()).with_label("pool", "blue"),
            NodeInfo::new("gpu-1".to_string()).with_label("pool", "gpu"),
            NodeInfo::new("gpu-2".to_string()).with_label("pool", "gpu"),
            NodeInfo::new("loose".to_string()),
        ];
        let cluster = ClusterState::new(
            "prod".to_string(),
            false,
            ClusterOutcome::Ready(ClusterInventory {
                endpoint: "https://prod:6443".to_string(),
                nodes,
                pods: Vec::new(),
            }),
        );
        let mut state = AppState::new("pool");
        state.set_snapshot(FleetSnapshot::new(Utc::now(), vec![cluster]));
        assert!(state.open_highlighted());
        state.list_down();

        let mut terminal = Terminal::new(TestBackend::new(120, 16)).unwrap();
        terminal
            .draw(|frame| PoolDetailScreen::render(frame, &mut state))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(text.contains("gpu-2"));
        assert!(!text.contains("blue-1"));
        assert!(!text.contains("loose"));
        assert!(text.contains("3/4 nodes pooled"));
    }
}
