use crossterm::{
    cursor, execute,
    style::ResetColor,
    terminal::{self, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use std::{
    io::{self, Stdout},
    panic,
    sync::Once,
};
use tracing::{debug, warn};

const TITLE: &str = "Grid Animation";

static PANIC_HOOK: Once = Once::new();

/// Owns the terminal while the animation runs.
///
/// Creating it switches to raw mode and the alternate screen; dropping it restores the terminal.
/// A panic hook restores it as well, so panics don't leave the terminal unusable.
pub struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self, TerminalError> {
        install_panic_hook();
        terminal::enable_raw_mode().map_err(TerminalError::Setup)?;
        let mut stdout = io::stdout();
        let setup = execute!(stdout, EnterAlternateScreen, DisableLineWrap, cursor::Hide, SetTitle(TITLE));
        if let Err(e) = setup {
            let _ = restore();
            return Err(TerminalError::Setup(e));
        }
        debug!("terminal session started");
        Ok(Self { stdout })
    }

    pub fn writer(&mut self) -> &mut Stdout {
        &mut self.stdout
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        match restore() {
            Ok(()) => debug!("terminal restored"),
            Err(e) => warn!("failed to restore terminal: {e}"),
        }
    }
}

fn restore() -> io::Result<()> {
    let mut stdout = io::stdout();
    let screen = execute!(stdout, ResetColor, cursor::Show, EnableLineWrap, LeaveAlternateScreen);
    let raw_mode = terminal::disable_raw_mode();
    screen.and(raw_mode)
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = restore();
            previous(info);
        }));
    });
}

/// Errors that can occur while driving the terminal
#[derive(thiserror::Error, Debug)]
pub enum TerminalError {
    #[error("failed to set up terminal: {0}")]
    Setup(io::Error),

    #[error("terminal io: {0}")]
    Io(#[from] io::Error),
}
