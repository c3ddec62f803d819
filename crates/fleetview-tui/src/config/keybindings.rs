use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    ListNavigation,
    Help,
}

type BindingTable = HashMap<KeyBinding, Action>;

fn table<const N: usize>(entries: [(KeyBinding, Action); N]) -> BindingTable {
    entries.into_iter().collect()
}

fn key(c: char) -> KeyBinding {
    KeyBinding::new(KeyCode::Char(c))
}

/// Key lookup per context, falling back to the global table
pub struct KeyBindings {
    bindings: HashMap<KeyContext, BindingTable>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let global = table([
            (key('?'), Action::ToggleHelp),
            (KeyBinding::new(KeyCode::Esc), Action::GoBack),
            (key('r'), Action::Refresh),
            (KeyBinding::ctrl(KeyCode::Char('r')), Action::Refresh),
            (key('x'), Action::DismissError),
            (KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit),
            (key('q'), Action::Quit),
        ]);

        let list = table([
            (key('j'), Action::ListDown),
            (KeyBinding::new(KeyCode::Down), Action::ListDown),
            (key('k'), Action::ListUp),
            (KeyBinding::new(KeyCode::Up), Action::ListUp),
            (KeyBinding::new(KeyCode::Enter), Action::ListSelect),
            (key('l'), Action::ListSelect),
            (key('h'), Action::GoBack),
        ]);

        // Any of these closes the help overlay
        let help = table([
            (KeyBinding::new(KeyCode::Esc), Action::ToggleHelp),
            (key('?'), Action::ToggleHelp),
            (key('q'), Action::ToggleHelp),
        ]);

        Self {
            bindings: HashMap::from([
                (KeyContext::Global, global),
                (KeyContext::ListNavigation, list),
                (KeyContext::Help, help),
            ]),
        }
    }

    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);
        let lookup = |context: &KeyContext| self.bindings.get(context)?.get(&binding).cloned();

        match context {
            // The help overlay swallows everything else
            KeyContext::Help => lookup(&KeyContext::Help),
            other => lookup(&other).or_else(|| lookup(&KeyContext::Global)),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_list_navigation_keys() {
        let bindings = KeyBindings::new();

        assert_eq!(
            bindings.get_action(KeyContext::ListNavigation, &key(KeyCode::Char('j'))),
            Some(Action::ListDown)
        );
        assert_eq!(
            bindings.get_action(KeyContext::ListNavigation, &key(KeyCode::Enter)),
            Some(Action::ListSelect)
        );
    }

    #[test]
    fn test_falls_back_to_global() {
        let bindings = KeyBindings::new();

        assert_eq!(
            bindings.get_action(KeyContext::ListNavigation, &key(KeyCode::Char('r'))),
            Some(Action::Refresh)
        );
        assert_eq!(
            bindings.get_action(
                KeyContext::ListNavigation,
                &KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
            ),
            Some(Action::Quit)
        );
        assert_eq!(
            bindings.get_action(KeyContext::ListNavigation, &key(KeyCode::Char('z'))),
            None
        );
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let bindings = KeyBindings::new();

        assert_eq!(
            bindings.get_action(KeyContext::Help, &key(KeyCode::Char('q'))),
            Some(Action::ToggleHelp)
        );
        assert_eq!(bindings.get_action(KeyContext::Help, &key(KeyCode::Char('r'))), None);
    }
}
