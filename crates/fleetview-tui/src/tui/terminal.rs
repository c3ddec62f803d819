use std::io;

use ratatui::{DefaultTerminal, Frame};

/// Raw-mode alternate screen for the lifetime of the value
pub struct Tui {
    terminal: DefaultTerminal,
    restored: bool,
}

impl Tui {
    /// Also installs a panic hook that restores the terminal
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            terminal: ratatui::try_init()?,
            restored: false,
        })
    }

    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(render).map(|_| ())
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if !self.restored {
            self.restored = true;
            ratatui::try_restore()?;
        }
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
