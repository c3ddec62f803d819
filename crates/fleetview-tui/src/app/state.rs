use fleetview_types::{ClusterState, ClusterSummary, FleetSnapshot};
use ratatui::widgets::ListState;

/// Screen enumeration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    FleetOverview,
    PoolDetail,
}

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// UI-specific transient state
#[derive(Default)]
pub struct UiState {
    /// Is help overlay visible?
    pub help_visible: bool,

    /// List state for the active screen
    pub list_state: ListState,

    /// Error message to display (if any)
    pub error_message: Option<String>,

    /// Spinner frame while a collection is running
    pub spinner: usize,
}

/// Global application state
pub struct AppState {
    /// Current screen being displayed
    pub current_screen: Screen,

    /// Navigation stack for back navigation
    pub screen_stack: Vec<Screen>,

    /// Latest collection result, sorted by context
    pub snapshot: Option<FleetSnapshot>,

    /// Context opened on the pool detail screen
    pub selected_context: Option<String>,

    /// Node label that defines pools
    pub pool_label: String,

    /// Is a collection run in progress?
    pub collecting: bool,

    pub ui_state: UiState,

    /// Whether app should quit
    pub should_quit: bool,

    /// Dirty flag for rendering - only render when true
    pub render_dirty: bool,
}

impl AppState {
    pub fn new(pool_label: impl Into<String>) -> Self {
        let mut ui_state = UiState::default();
        ui_state.list_state.select(Some(0));

        Self {
            current_screen: Screen::FleetOverview,
            screen_stack: Vec::new(),
            snapshot: None,
            selected_context: None,
            pool_label: pool_label.into(),
            collecting: false,
            ui_state,
            should_quit: false,
            render_dirty: true,
        }
    }

    /// Navigate to a new screen, pushing current to stack
    pub fn navigate_to(&mut self, screen: Screen) {
        self.screen_stack.push(self.current_screen.clone());
        self.current_screen = screen;
        self.ui_state.list_state.select(Some(0));
    }

    /// Go back to previous screen, restoring the cluster selection
    pub fn go_back(&mut self) -> bool {
        let Some(prev_screen) = self.screen_stack.pop() else {
            return false;
        };

        self.current_screen = prev_screen;
        let index = match (&self.snapshot, &self.selected_context) {
            (Some(snapshot), Some(context)) => snapshot
                .clusters
                .iter()
                .position(|c| &c.context == context)
                .unwrap_or(0),
            _ => 0,
        };
        self.ui_state.list_state.select(Some(index));
        true
    }

    /// Get the current list length based on screen
    pub fn current_list_len(&self) -> usize {
        match self.current_screen {
            Screen::FleetOverview => self.snapshot.as_ref().map_or(0, FleetSnapshot::len),
            Screen::PoolDetail => self
                .selected_summary()
                .map_or(0, |summary| summary.pool_count()),
        }
    }

    /// Move selection up, wrapping at the top
    pub fn list_up(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }

        let i = match self.ui_state.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.ui_state.list_state.select(Some(i));
    }

    /// Move selection down, wrapping at the bottom
    pub fn list_down(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }

        let i = match self.ui_state.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.ui_state.list_state.select(Some(i));
    }

    /// Cluster under the cursor on the overview screen
    pub fn highlighted_cluster(&self) -> Option<&ClusterState> {
        let snapshot = self.snapshot.as_ref()?;
        snapshot.clusters.get(self.ui_state.list_state.selected()?)
    }

    /// Cluster opened on the pool detail screen
    pub fn selected_cluster(&self) -> Option<&ClusterState> {
        let context = self.selected_context.as_deref()?;
        self.snapshot.as_ref()?.get(context)
    }

    /// Pool summary of the opened cluster
    pub fn selected_summary(&self) -> Option<ClusterSummary> {
        self.selected_cluster()?.summary(&self.pool_label)
    }

    /// Open the highlighted cluster's pools; failed clusters have none
    pub fn open_highlighted(&mut self) -> bool {
        let context = match self.highlighted_cluster() {
            Some(cluster) if cluster.is_ready() => cluster.context.clone(),
            _ => return false,
        };

        self.selected_context = Some(context);
        self.navigate_to(Screen::PoolDetail);
        true
    }

    /// Mark a collection run as started
    pub fn begin_collecting(&mut self) {
        self.collecting = true;
        self.ui_state.spinner = 0;
        self.render_dirty = true;
    }

    /// Install a fresh snapshot, keeping the cursor on the same context
    pub fn set_snapshot(&mut self, mut snapshot: FleetSnapshot) {
        snapshot.sort_by_context();

        // On the pool screen the list cursor indexes pools, not clusters
        let highlighted = match self.current_screen {
            Screen::PoolDetail => self.selected_context.clone(),
            Screen::FleetOverview => self.highlighted_cluster().map(|c| c.context.clone()),
        };
        let index = highlighted
            .and_then(|name| snapshot.clusters.iter().position(|c| c.context == name))
            .unwrap_or(0);

        if let Some(context) = &self.selected_context {
            if !snapshot.get(context).is_some_and(ClusterState::is_ready) {
                // The opened cluster vanished or failed
                self.selected_context = None;
                self.current_screen = Screen::FleetOverview;
                self.screen_stack.clear();
            }
        }

        self.snapshot = Some(snapshot);
        self.collecting = false;
        if self.current_screen == Screen::FleetOverview {
            self.ui_state.list_state.select(Some(index));
        }
        self.render_dirty = true;
    }

    /// Collection could not start; keep the previous snapshot
    pub fn collection_failed(&mut self, message: String) {
        self.collecting = false;
        self.show_error(message);
    }

    /// Advance the spinner while collecting
    pub fn tick(&mut self) {
        if self.collecting {
            self.ui_state.spinner = (self.ui_state.spinner + 1) % SPINNER.len();
            self.render_dirty = true;
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.ui_state.spinner % SPINNER.len()]
    }

    /// Show an error message
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.ui_state.error_message = Some(message.into());
        self.render_dirty = true;
    }

    /// Dismiss the current error
    pub fn dismiss_error(&mut self) {
        self.ui_state.error_message = None;
        self.render_dirty = true;
    }

    /// Mark state as needing a re-render
    pub fn mark_dirty(&mut self) {
        self.render_dirty = true;
    }
}
