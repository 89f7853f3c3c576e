//! Terminal setup and teardown for the full-screen frontends.
//!
//! `TerminalGuard` enters raw mode and the alternate screen on creation and
//! restores the terminal when dropped, including on early returns and panics.

use std::io::{self, stdout};

use anyhow::anyhow;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::debug;

use crate::errors::AppError;

pub struct TerminalGuard {
    mouse: bool,
}

impl TerminalGuard {
    pub fn acquire(mouse: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on, Drop restores whatever was enabled.
        let guard = Self { mouse };

        execute!(stdout(), EnterAlternateScreen, Hide)?;
        if mouse {
            execute!(stdout(), EnableMouseCapture)?;
        }
        debug!("terminal acquired (mouse: {mouse})");
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.mouse {
            let _ = execute!(out, DisableMouseCapture);
        }
        let _ = execute!(out, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads the next terminal event without blocking the runtime.
pub async fn read_event() -> Result<Event, AppError> {
    let event = tokio::task::spawn_blocking(event::read)
        .await
        .map_err(|e| AppError::Internal(anyhow!("terminal reader task failed: {e}")))??;
    Ok(event)
}

/// Terminal size in cells, with a teletext-sized fallback.
pub fn size() -> (u16, u16) {
    terminal::size().unwrap_or((80, 25))
}
