/// What a key press asks the application to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Leave the pool screen, or quit from the cluster list
    GoBack,
    Quit,
    ListUp,
    ListDown,
    /// Open the pools of the highlighted cluster
    ListSelect,
    ToggleHelp,
    /// Start a new fleet collection unless one is running
    Refresh,
    DismissError,
    /// Redraw without a state change, e.g. after a resize
    Render,
}
