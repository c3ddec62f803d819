//! TUI components for fleetview
//!
//! This crate provides the terminal user interface for fleetview,
//! including state management, keybindings, event handling, and UI components.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{Action, AppState, Screen, UiState};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{
    HelpOverlay, ListSelector, ListSelectorExt, RowKind, StatusBar, list_nav_hints,
};
pub use ui::screens::{FleetOverviewScreen, PoolDetailScreen};
pub use ui::{Layout, Theme};
