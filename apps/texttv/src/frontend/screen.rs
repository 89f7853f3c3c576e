//! Full-screen character-cell frontend.

use std::io::{self, Stdout, Write};

use async_trait::async_trait;
use crossterm::{
    cursor::MoveTo,
    event::Event,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::errors::AppError;
use crate::frontend::terminal::{self, TerminalGuard};
use crate::frontend::{map_key, Frontend};
use crate::layout::Row;
use crate::navigation::{Input, View};

const HEADER_BG: Color = Color::Blue;
const HEADER_FG: Color = Color::White;
const TEXT_FG: Color = Color::White;
const FOOTER_FG: Color = Color::Cyan;
const STATUS_FG: Color = Color::Yellow;
const NOTICE_FG: Color = Color::Red;

pub struct ScreenFrontend {
    _guard: TerminalGuard,
    out: Stdout,
}

impl ScreenFrontend {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            _guard: TerminalGuard::acquire(false)?,
            out: io::stdout(),
        })
    }
}

#[async_trait]
impl Frontend for ScreenFrontend {
    async fn next_input(&mut self) -> Result<Input, AppError> {
        loop {
            match terminal::read_event().await? {
                Event::Key(key) => {
                    if let Some(input) = map_key(key) {
                        return Ok(input);
                    }
                }
                Event::Resize(..) => return Ok(Input::Redraw),
                _ => {}
            }
        }
    }

    fn render(&mut self, view: &View<'_>) -> Result<(), AppError> {
        let (_, height) = terminal::size();
        queue!(self.out, Clear(ClearType::All))?;
        draw_text(&mut self.out, view, height.saturating_sub(1))?;
        draw_status(&mut self.out, view, height.saturating_sub(1))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Draws the layout rows from the top, stopping before `max_rows`.
pub(crate) fn draw_text<W: Write>(out: &mut W, view: &View<'_>, max_rows: u16) -> io::Result<()> {
    let rows: Vec<(Color, Color, String)> = match &view.layout {
        Some(Ok(layout)) => layout
            .rows()
            .into_iter()
            .map(|row| match row {
                Row::Header(l) => (HEADER_FG, HEADER_BG, l.to_string()),
                Row::Content(l) => (TEXT_FG, Color::Reset, l.to_string()),
                Row::Footer(l) => (FOOTER_FG, Color::Reset, l.to_string()),
                Row::Separator => (TEXT_FG, Color::Reset, String::new()),
            })
            .collect(),
        _ => view
            .body_lines()
            .into_iter()
            .map(|l| (NOTICE_FG, Color::Reset, l))
            .collect(),
    };

    for (y, (fg, bg, text)) in (0..max_rows).zip(rows) {
        queue!(
            out,
            MoveTo(0, y),
            SetForegroundColor(fg),
            SetBackgroundColor(bg),
            Print(text),
            ResetColor
        )?;
    }
    Ok(())
}

pub(crate) fn draw_status<W: Write>(out: &mut W, view: &View<'_>, row: u16) -> io::Result<()> {
    queue!(
        out,
        MoveTo(0, row),
        Clear(ClearType::CurrentLine),
        SetForegroundColor(STATUS_FG),
        Print(view.status_line()),
        ResetColor
    )
}
