use chrono::Local;
use fleetview_types::ClusterState;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{
    app::AppState,
    ui::{
        components::{list_nav_hints, ListSelector, ListSelectorExt, RowKind, StatusBar},
        Layout, Theme,
    },
};

/// Cluster list with a summary of the highlighted cluster
pub struct FleetOverviewScreen;

impl FleetOverviewScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, status_area) = Layout::main(frame.area());
        let (list_area, detail_area) = Layout::list_detail(content_area);

        Self::render_header(frame, header_area, state);
        Self::render_list(frame, list_area, state);
        Self::render_detail(frame, detail_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let mut spans = vec![
            Span::styled("fleetview", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled("Fleet Viewer", Theme::text()),
        ];

        if state.collecting {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(
                format!("{} Collecting…", state.spinner()),
                Theme::collecting(),
            ));
        } else if let Some(snapshot) = &state.snapshot {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(
                format!(
                    "collected {}",
                    snapshot.collected_at.with_timezone(&Local).format("%H:%M:%S")
                ),
                Theme::text_dim(),
            ));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let items: Vec<(String, RowKind)> = state
            .snapshot
            .iter()
            .flat_map(|snapshot| snapshot.iter())
            .map(|cluster| (row_text(cluster), row_kind(cluster)))
            .collect();

        let selector = ListSelector::new(" Clusters ").items(items);

        frame.render_list_selector(area, selector, &mut state.ui_state.list_state);
    }

    fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
        let (title, lines) = match state.highlighted_cluster() {
            Some(cluster) => (
                format!(" {} ", cluster.context),
                detail_lines(cluster, &state.pool_label),
            ),
            None if state.collecting => (
                String::new(),
                vec![Line::from(Span::styled(
                    "Collecting fleet state…",
                    Theme::collecting(),
                ))],
            ),
            None => (
                String::new(),
                vec![Line::from(Span::styled(
                    "No contexts found in kubeconfig",
                    Theme::text_dim(),
                ))],
            ),
        };

        let detail = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(title, Theme::title())),
        );

        frame.render_widget(detail, area);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let right = match &state.snapshot {
            Some(snapshot) => format!("{}/{} clusters ok", snapshot.succeeded(), snapshot.len()),
            None => String::new(),
        };

        let status = StatusBar::new()
            .hints(list_nav_hints())
            .right(right)
            .error(state.ui_state.error_message.as_deref());

        frame.render_widget(status, area);
    }
}

/// "<context>  <nodes>/<pods>", or "error" for failed clusters
fn row_text(cluster: &ClusterState) -> String {
    let counts = cluster.counts().unwrap_or_else(|| "error".to_string());
    format!("{}  {}", cluster.context, counts)
}

fn row_kind(cluster: &ClusterState) -> RowKind {
    if !cluster.is_ready() {
        RowKind::Failed
    } else if cluster.is_current {
        RowKind::Current
    } else {
        RowKind::Normal
    }
}

fn detail_lines(cluster: &ClusterState, pool_label: &str) -> Vec<Line<'static>> {
    if let Some(error) = cluster.error() {
        return vec![Line::from(Span::styled(error.to_string(), Theme::error()))];
    }

    let Some(summary) = cluster.summary(pool_label) else {
        return Vec::new();
    };

    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<14}", label), Theme::label()),
            Span::styled(value, Theme::value()),
        ])
    };

    let mut lines = vec![
        field("Endpoint:", cluster.endpoint().unwrap_or_default().to_string()),
        Line::from(""),
        field("Total Nodes:", summary.total_nodes.to_string()),
        field("Ready Nodes:", summary.ready_nodes.to_string()),
        field("Total Pods:", summary.total_pods.to_string()),
        field("Running Pods:", summary.running_pods.to_string()),
        field("Node Pools:", summary.pool_count().to_string()),
    ];

    for (pool, members) in &summary.pools {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", pool), Theme::text()),
            Span::styled(format!("  {} nodes", members.len()), Theme::text_dim()),
        ]));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fleetview_types::{
        ClusterError, ClusterInventory, ClusterOutcome, FleetSnapshot, NodeInfo, PodInfo,
    };
    use ratatui::{backend::TestBackend, Terminal};

    fn prod() -> ClusterState {
        ClusterState::new(
            "prod".to_string(),
            true,
            ClusterOutcome::Ready(ClusterInventory {
                endpoint: "https://prod.example.com:6443".to_string(),
                nodes: (0..5)
                    .map(|i| NodeInfo::new(format!("node-{i}")).with_label("pool", "blue"))
                    .collect(),
                pods: (0..20)
                    .map(|i| PodInfo::new(format!("pod-{i}"), "default".to_string()))
                    .collect(),
            }),
        )
    }

    fn staging() -> ClusterState {
        ClusterState::new(
            "staging".to_string(),
            false,
            ClusterOutcome::Failed {
                error: ClusterError::ConfigResolution {
                    context: "staging".to_string(),
                    message: "no route to host".to_string(),
                },
            },
        )
    }

    fn screen_text(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 20)).unwrap();
        terminal
            .draw(|frame| FleetOverviewScreen::render(frame, state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_row_text() {
        assert_eq!(row_text(&prod()), "prod  5/20");
        assert_eq!(row_text(&staging()), "staging  error");
        assert_eq!(row_kind(&prod()), RowKind::Current);
        assert_eq!(row_kind(&staging()), RowKind::Failed);
    }

    #[test]
    fn test_renders_summary_of_highlighted_cluster() {
        let mut state = AppState::new("pool");
        state.set_snapshot(FleetSnapshot::new(Utc::now(), vec![staging(), prod()]));

        let text = screen_text(&mut state);

        assert!(text.contains("Total Nodes:  5"));
        assert!(text.contains("Total Pods:   20"));
        assert!(text.contains("Node Pools:   1"));
        assert!(text.contains("1/2 clusters ok"));
    }

    #[test]
    fn test_renders_error_for_failed_cluster() {
        let mut state = AppState::new("pool");
        state.set_snapshot(FleetSnapshot::new(Utc::now(), vec![prod(), staging()]));
        state.list_down();

        let text = screen_text(&mut state);

        assert!(text.contains("no route to host"));
        assert!(!text.contains("Total Nodes"));
    }
}
