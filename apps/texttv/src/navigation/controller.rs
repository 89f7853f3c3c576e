//! Navigation controller: the only writer of `NavigationState`.
//!
//! # Cycle
//! - `sync` fetches when the requested page differs from the displayed one.
//!   A failed fetch puts the requested page back to the displayed page and
//!   touches nothing else.
//! - `view` derives what a frontend draws.
//! - `handle` applies one input.

use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::hotspot::{HotspotIndex, HotspotRegion};
use crate::layout;
use crate::navigation::view::View;
use crate::navigation::{Flow, Input};
use crate::page_client::{FetchError, PageFetch, PageSource, Subpage};

/// Digits accepted by the page-jump prompt.
pub const JUMP_DIGITS: usize = 3;
const STARTUP_ATTEMPTS: u32 = 2;

/// What is currently displayed, plus the page the user asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub current_page: u32,
    pub subpage_index: usize,
    pub subpages: Vec<Subpage>,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    /// Page the cached subpages were fetched for. `None` before the first fetch.
    pub displayed_page: Option<u32>,
}

impl NavigationState {
    pub fn new(start_page: u32) -> Self {
        Self {
            current_page: start_page,
            ..Self::default()
        }
    }

    pub fn current_subpage(&self) -> Option<&Subpage> {
        self.subpages.get(self.subpage_index)
    }

    fn fetch_pending(&self) -> bool {
        self.displayed_page != Some(self.current_page)
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Backward,
    Forward,
}

pub struct NavigationController<S> {
    source: S,
    state: NavigationState,
    jump: Option<String>,
    hover: Option<HotspotRegion>,
}

impl<S: PageSource> NavigationController<S> {
    pub fn new(source: S, start_page: u32) -> Self {
        Self {
            source,
            state: NavigationState::new(start_page),
            jump: None,
            hover: None,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Loads the start page. Gives up after a second failure.
    pub async fn start(&mut self) -> Result<(), AppError> {
        let page = self.state.current_page;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.source.fetch(page).await {
                Ok(fetched) => {
                    info!("start page {page} loaded");
                    self.install(page, fetched);
                    return Ok(());
                }
                Err(e) if attempt < STARTUP_ATTEMPTS => {
                    warn!("start page {page} failed (attempt {attempt}): {e}, retrying");
                }
                Err(source) => return Err(AppError::StartupFetch { page, source }),
            }
        }
    }

    pub fn fetch_pending(&self) -> bool {
        self.state.fetch_pending()
    }

    /// Fetches the requested page if it is not the one on display.
    /// Returns true when the displayed page changed. On error the request is
    /// withdrawn and the displayed page stays as it was.
    pub async fn sync(&mut self) -> Result<bool, FetchError> {
        if !self.state.fetch_pending() {
            return Ok(false);
        }

        let page = self.state.current_page;
        match self.source.fetch(page).await {
            Ok(fetched) => {
                self.install(page, fetched);
                Ok(true)
            }
            Err(e) => {
                debug!("withdrawing request for page {page}");
                if let Some(displayed) = self.state.displayed_page {
                    self.state.current_page = displayed;
                }
                Err(e)
            }
        }
    }

    fn install(&mut self, page: u32, fetched: PageFetch) {
        let backward = self.state.displayed_page.is_some_and(|prev| page < prev);
        let count = fetched.subpages.len();

        debug!(
            "showing page {page} ({count} subpages, prev={:?}, next={:?})",
            fetched.prev_page, fetched.next_page
        );

        self.state.subpage_index = if backward { count.saturating_sub(1) } else { 0 };
        self.state.subpages = fetched.subpages;
        self.state.prev_page = fetched.prev_page;
        self.state.next_page = fetched.next_page;
        self.state.displayed_page = Some(page);
        self.state.current_page = page;
        self.hover = None;
    }

    /// Applies one input. Page changes take effect on the next `sync`.
    pub fn handle(&mut self, input: Input) -> Flow {
        if self.jump.is_some() {
            return self.handle_jump(input);
        }

        match input {
            Input::Quit => return Flow::Quit,
            Input::Next => self.step(Direction::Forward),
            Input::Previous => self.step(Direction::Backward),
            Input::BeginJump => self.jump = Some(String::with_capacity(JUMP_DIGITS)),
            Input::HoverAt { x, y } => self.hover_at(x, y),
            Input::ClickAt { x, y } => self.click_at(x, y),
            Input::Digit(_)
            | Input::ConfirmJump
            | Input::CancelJump
            | Input::EraseDigit
            | Input::Redraw => {}
        }
        Flow::Continue
    }

    fn handle_jump(&mut self, input: Input) -> Flow {
        let Some(mut buffer) = self.jump.take() else {
            return Flow::Continue;
        };

        match input {
            Input::Quit => return Flow::Quit,
            Input::Digit(d) if d <= 9 => {
                buffer.push(char::from(b'0' + d));
                if buffer.len() < JUMP_DIGITS {
                    self.jump = Some(buffer);
                } else {
                    self.finish_jump(&buffer);
                }
            }
            Input::ConfirmJump => self.finish_jump(&buffer),
            Input::EraseDigit => {
                if buffer.pop().is_some() {
                    self.jump = Some(buffer);
                }
            }
            Input::HoverAt { x, y } => {
                self.jump = Some(buffer);
                self.hover_at(x, y);
            }
            Input::Redraw => self.jump = Some(buffer),
            other => debug!("page jump '{buffer}' cancelled by {other:?}"),
        }
        Flow::Continue
    }

    fn finish_jump(&mut self, digits: &str) {
        match digits.parse::<u32>() {
            Ok(page) if page > 0 => {
                debug!("jump to page {page}");
                self.state.current_page = page;
            }
            _ => debug!("ignoring page jump '{digits}'"),
        }
    }

    fn step(&mut self, direction: Direction) {
        let count = self.state.subpages.len();
        let index = self.state.subpage_index;

        let (within_page, neighbour) = match direction {
            Direction::Forward => (index + 1 < count, self.state.next_page),
            Direction::Backward => (index > 0, self.state.prev_page),
        };

        if count > 1 && within_page {
            self.state.subpage_index = match direction {
                Direction::Forward => index + 1,
                Direction::Backward => index - 1,
            };
            self.hover = None;
        } else if let Some(page) = neighbour {
            self.state.current_page = page;
        }
    }

    fn hotspots(&self) -> HotspotIndex {
        self.state
            .current_subpage()
            .and_then(|sp| sp.hotspot_descriptor.as_deref())
            .map(HotspotIndex::parse)
            .unwrap_or_default()
    }

    fn hover_at(&mut self, x: u32, y: u32) {
        self.hover = self.hotspots().hover(x, y).copied();
    }

    fn click_at(&mut self, x: u32, y: u32) {
        if let Some(page) = self.hotspots().resolve_click(x, y) {
            debug!("hotspot at ({x},{y}) -> page {page}");
            self.state.current_page = page;
        }
    }

    /// Snapshot for the frontend. The layout is recomputed on every call.
    pub fn view(&self) -> View<'_> {
        let subpage = self.state.current_subpage();
        let layout = subpage.map(|sp| {
            let result = layout::layout(sp.raw_text.as_slice());
            if let Err(e) = &result {
                debug!(
                    "subpage {} of page {}: {e}",
                    self.state.subpage_index, self.state.current_page
                );
            }
            result
        });

        View {
            page: self.state.current_page,
            subpage_index: self.state.subpage_index,
            subpage_count: self.state.subpages.len(),
            prev_page: self.state.prev_page,
            next_page: self.state.next_page,
            subpage,
            layout,
            jump_input: self.jump.as_deref(),
            hover_target: self.hover.map(|r| r.target_page),
        }
    }
}
