use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use fleetview_k8s::{CollectError, FleetCollector, FleetSnapshot, KubeConfigStore};
use fleetview_tui::{
    Action, AppState, Event, EventHandler, FleetOverviewScreen, HelpOverlay, KeyBindings,
    KeyContext, PoolDetailScreen, Screen, Tui,
};

mod config;

use config::{FileConfig, Settings};

/// Fleetview - node and pod summary of every cluster in your kubeconfig
#[derive(Parser, Debug)]
#[command(name = "fleetview")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Kubeconfig file (defaults to $KUBECONFIG, then ~/.kube/config)
    #[arg(long, value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// Per-cluster deadline in seconds (0 waits forever)
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Maximum clusters queried at once (0 queries all at once)
    #[arg(long, value_name = "N")]
    max_concurrency: Option<usize>,

    /// Node label that names a node's pool
    #[arg(long, value_name = "KEY")]
    pool_label: Option<String>,

    /// Config file
    #[arg(long, env = "FLEETVIEW_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the snapshot as JSON instead of starting the UI
    #[arg(long)]
    json: bool,
}

impl Args {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            kubeconfig: self.kubeconfig.clone(),
            timeout_secs: self.timeout_secs,
            max_concurrency: self.max_concurrency,
            pool_label: self.pool_label.clone(),
        }
    }

    fn settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::load_default()?,
        };
        Ok(Settings::resolve(self.overrides().or(file)))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_ansi(args.json)
        .with_writer(log_writer(args.json, config::log_path()))
        .init();

    let result = run(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

/// Stderr for `--json`; otherwise the UI owns the terminal, so logs go to a
/// file or are discarded
fn log_writer(json: bool, log_file: Option<PathBuf>) -> BoxMakeWriter {
    if json {
        return BoxMakeWriter::new(std::io::stderr);
    }

    let file = log_file.and_then(|path| {
        std::fs::create_dir_all(path.parent()?).ok()?;
        OpenOptions::new().create(true).append(true).open(path).ok()
    });

    match file {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(std::io::sink),
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = args.settings()?;
    tracing::debug!(?settings, "Resolved settings");

    let store = match &settings.kubeconfig {
        Some(path) => KubeConfigStore::with_path(path),
        None => KubeConfigStore::new(),
    };
    let collector = Arc::new(FleetCollector::new(store).with_options(settings.collect_options()));

    if args.json {
        return print_json(&collector).await;
    }

    run_app(collector, settings).await
}

async fn print_json(collector: &FleetCollector<KubeConfigStore>) -> Result<()> {
    let mut snapshot = collector
        .collect_all()
        .await
        .context("Failed to collect fleet state")?;
    snapshot.sort_by_context();

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Internal actions for async operations
enum InternalAction {
    Collect,
    Collected(Result<FleetSnapshot, CollectError>),
}

async fn run_app(collector: Arc<FleetCollector<KubeConfigStore>>, settings: Settings) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<InternalAction>();

    let mut state = AppState::new(settings.pool_label);
    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(150));
    let keybindings = KeyBindings::new();

    let _ = internal_tx.send(InternalAction::Collect);
    render(&mut tui, &mut state)?;

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        let context = if state.ui_state.help_visible {
                            KeyContext::Help
                        } else {
                            KeyContext::ListNavigation
                        };

                        if let Some(action) = keybindings.get_action(context, &key) {
                            let _ = action_tx.send(action);
                        }
                    }
                    Event::Tick => state.tick(),
                    Event::Resize(_, _) => {
                        let _ = action_tx.send(Action::Render);
                    }
                    Event::Error(e) => state.show_error(e),
                }
            }

            Some(action) = action_rx.recv() => {
                handle_action(&mut state, &internal_tx, action);
            }

            Some(internal) = internal_rx.recv() => {
                match internal {
                    InternalAction::Collect => {
                        // One run at a time
                        if !state.collecting {
                            state.begin_collecting();
                            spawn_collection(Arc::clone(&collector), internal_tx.clone());
                        }
                    }
                    InternalAction::Collected(Ok(snapshot)) => state.set_snapshot(snapshot),
                    InternalAction::Collected(Err(e)) => state.collection_failed(e.to_string()),
                }
            }
        }

        if state.should_quit {
            break;
        }

        if state.render_dirty {
            render(&mut tui, &mut state)?;
        }
    }

    events.shutdown();
    tui.restore()?;
    Ok(())
}

fn spawn_collection(
    collector: Arc<FleetCollector<KubeConfigStore>>,
    internal_tx: mpsc::UnboundedSender<InternalAction>,
) {
    tokio::spawn(async move {
        let result = collector.collect_all().await;
        let _ = internal_tx.send(InternalAction::Collected(result));
    });
}

fn handle_action(
    state: &mut AppState,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    action: Action,
) {
    match action {
        Action::Quit => state.should_quit = true,
        Action::GoBack => {
            if state.ui_state.error_message.is_some() {
                state.dismiss_error();
            } else if !state.go_back() && state.current_screen == Screen::FleetOverview {
                state.should_quit = true;
            }
        }
        Action::ListUp => state.list_up(),
        Action::ListDown => state.list_down(),
        Action::ListSelect => {
            if state.current_screen == Screen::FleetOverview {
                state.open_highlighted();
            }
        }
        Action::ToggleHelp => state.ui_state.help_visible = !state.ui_state.help_visible,
        Action::Refresh => {
            let _ = internal_tx.send(InternalAction::Collect);
        }
        Action::DismissError => state.dismiss_error(),
        Action::Render => {}
    }

    state.mark_dirty();
}

fn render(tui: &mut Tui, state: &mut AppState) -> Result<()> {
    tui.draw(|frame| {
        match state.current_screen {
            Screen::FleetOverview => FleetOverviewScreen::render(frame, state),
            Screen::PoolDetail => PoolDetailScreen::render(frame, state),
        }

        if state.ui_state.help_visible {
            HelpOverlay::render(frame);
        }
    })?;

    state.render_dirty = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "fleetview",
            "--timeout-secs",
            "5",
            "--pool-label",
            "agentpool",
            "--json",
        ])
        .unwrap();

        assert!(args.json);
        let overrides = args.overrides();
        assert_eq!(overrides.timeout_secs, Some(5));
        assert_eq!(overrides.pool_label.as_deref(), Some("agentpool"));
        assert!(overrides.kubeconfig.is_none());
    }

    #[test]
    fn test_ui_mode_logs_to_file() {
        use std::io::Write;
        use tracing_subscriber::fmt::MakeWriter;

        let path = std::env::temp_dir()
            .join(format!("fleetview-log-{}", std::process::id()))
            .join("fleetview.log");

        let writer = log_writer(false, Some(path.clone()));
        writer
            .make_writer()
            .write_all(b"Cluster query failed\n")
            .unwrap();

        let logged = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
        assert_eq!(logged, "Cluster query failed\n");
    }

    #[test]
    fn test_back_on_overview_quits() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new("pool");

        handle_action(&mut state, &tx, Action::GoBack);

        assert!(state.should_quit);
    }

    #[test]
    fn test_back_dismisses_error_first() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new("pool");
        state.show_error("boom");

        handle_action(&mut state, &tx, Action::GoBack);

        assert!(!state.should_quit);
        assert!(state.ui_state.error_message.is_none());
    }

    #[test]
    fn test_refresh_requests_collection() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = AppState::new("pool");

        handle_action(&mut state, &tx, Action::Refresh);

        assert!(matches!(rx.try_recv(), Ok(InternalAction::Collect)));
    }
}
