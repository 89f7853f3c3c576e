//! Line-oriented frontend: prints the page, reads one command per line.
//!
//! Commands: `q`, `p`/`h`, `n`/`l`, `:NNN`. Anything else redraws the page.

use std::collections::VecDeque;
use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tracing::debug;

use crate::errors::AppError;
use crate::frontend::Frontend;
use crate::navigation::controller::JUMP_DIGITS;
use crate::navigation::{Input, View};

pub struct PlainFrontend<R, W> {
    lines: Lines<BufReader<R>>,
    out: W,
    pending: VecDeque<Input>,
}

impl PlainFrontend<tokio::io::Stdin, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), std::io::stdout())
    }
}

impl<R, W> PlainFrontend<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: BufReader::new(input).lines(),
            out,
            pending: VecDeque::new(),
        }
    }
}

/// Translates one typed line into controller inputs.
fn translate(line: &str) -> Vec<Input> {
    let line = line.trim();
    match line {
        "q" => return vec![Input::Quit],
        "p" | "h" => return vec![Input::Previous],
        "n" | "l" => return vec![Input::Next],
        _ => {}
    }

    let Some(digits) = line.strip_prefix(':') else {
        return vec![Input::Redraw];
    };
    let digits = digits.trim();
    if digits.is_empty() || digits.len() > JUMP_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        debug!("ignoring page jump '{line}'");
        return vec![Input::Redraw];
    }

    let mut inputs = vec![Input::BeginJump];
    inputs.extend(digits.bytes().map(|b| Input::Digit(b - b'0')));
    if digits.len() < JUMP_DIGITS {
        inputs.push(Input::ConfirmJump);
    }
    inputs
}

#[async_trait]
impl<R, W> Frontend for PlainFrontend<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: Write + Send,
{
    async fn next_input(&mut self) -> Result<Input, AppError> {
        loop {
            if let Some(input) = self.pending.pop_front() {
                return Ok(input);
            }
            match self.lines.next_line().await? {
                Some(line) => self.pending.extend(translate(&line)),
                // End of input ends the session.
                None => return Ok(Input::Quit),
            }
        }
    }

    fn render(&mut self, view: &View<'_>) -> Result<(), AppError> {
        // Jump inputs arrive in one batch; skip the intermediate frames.
        if view.jump_input.is_some() {
            return Ok(());
        }
        for line in view.body_lines() {
            writeln!(self.out, "{}", line.trim_end())?;
        }
        writeln!(self.out, "{}", view.status_line())?;
        self.out.flush()?;
        Ok(())
    }
}
