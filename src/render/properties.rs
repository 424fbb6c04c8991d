use crossterm::terminal;
use std::io;

/// The size of the terminal window, in character cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub columns: u16,
}

impl WindowSize {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self { rows, columns }
    }

    /// Get the current terminal's size.
    pub fn current() -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        Ok(Self { rows, columns })
    }
}

impl From<(u16, u16)> for WindowSize {
    fn from((columns, rows): (u16, u16)) -> Self {
        Self { rows, columns }
    }
}
