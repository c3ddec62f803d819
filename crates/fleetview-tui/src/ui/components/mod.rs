mod help_overlay;
mod list_selector;
mod status_bar;

pub use help_overlay::HelpOverlay;
pub use list_selector::{ListSelector, ListSelectorExt, RowKind};
pub use status_bar::{list_nav_hints, StatusBar};
