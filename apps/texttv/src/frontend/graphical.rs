//! Graphical frontend: the page bitmap drawn with half-block cells.
//!
//! Each terminal cell shows two vertically stacked pixels (`▀`, foreground on
//! top, background below). The bitmap is downscaled by an integer factor so it
//! fits the terminal; mouse positions are mapped back through the same factor
//! to the bitmap's pixel coordinates, which is what hotspots are expressed in.
//! Subpages without a bitmap, or whose bitmap fails to decode, are drawn as text.

use std::io::{self, Stdout, Write};

use async_trait::async_trait;
use crossterm::{
    cursor::MoveTo,
    event::{Event, MouseButton, MouseEventKind},
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use image::RgbaImage;
use tracing::warn;

use crate::bitmap;
use crate::errors::AppError;
use crate::frontend::screen::{draw_status, draw_text};
use crate::frontend::terminal::{self, TerminalGuard};
use crate::frontend::{map_key, Frontend};
use crate::navigation::{Input, View};

const UPPER_HALF_BLOCK: char = '\u{2580}';

/// Placement of a bitmap on the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Bitmap pixels per cell column; each cell row covers twice as many.
    pub scale: u32,
    pub cols: u16,
    pub rows: u16,
}

impl Geometry {
    /// Smallest integer downscale that fits `width x height` into `term_cols x term_rows` cells.
    pub fn fit(width: u32, height: u32, term_cols: u16, term_rows: u16) -> Self {
        let cols = u32::from(term_cols.max(1));
        let pixel_rows = 2 * u32::from(term_rows.max(1));
        let scale = width.div_ceil(cols).max(height.div_ceil(pixel_rows)).max(1);

        Self {
            scale,
            cols: clamp_u16(width.div_ceil(scale)),
            rows: clamp_u16(height.div_ceil(2 * scale)),
        }
    }

    /// Centre of the cell in bitmap pixels.
    pub fn to_pixel(&self, col: u16, row: u16) -> (u32, u32) {
        let x = u32::from(col) * self.scale + self.scale / 2;
        let y = u32::from(row) * 2 * self.scale + self.scale;
        (x, y)
    }
}

fn clamp_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Bitmap of the subpage on display, decoded once per subpage.
struct CachedBitmap {
    key: (u32, usize),
    image: Option<RgbaImage>,
}

pub struct GraphicalFrontend {
    _guard: TerminalGuard,
    out: Stdout,
    cached: Option<CachedBitmap>,
    geometry: Option<Geometry>,
}

impl GraphicalFrontend {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            _guard: TerminalGuard::acquire(true)?,
            out: io::stdout(),
            cached: None,
            geometry: None,
        })
    }

    fn bitmap_for(&mut self, view: &View<'_>) -> Option<&RgbaImage> {
        let key = (view.page, view.subpage_index);
        let stale = self.cached.as_ref().map_or(true, |c| c.key != key);

        if stale {
            let image = view
                .subpage
                .and_then(|sp| sp.image_base64.as_deref())
                .and_then(|data| match bitmap::decode(data) {
                    Ok(image) => Some(image),
                    Err(e) => {
                        warn!("page {} bitmap unusable, drawing text: {e}", view.page);
                        None
                    }
                });
            self.cached = Some(CachedBitmap { key, image });
        }

        self.cached.as_ref().and_then(|c| c.image.as_ref())
    }
}

#[async_trait]
impl Frontend for GraphicalFrontend {
    async fn next_input(&mut self) -> Result<Input, AppError> {
        loop {
            match terminal::read_event().await? {
                Event::Key(key) => {
                    if let Some(input) = map_key(key) {
                        return Ok(input);
                    }
                }
                Event::Mouse(mouse) => {
                    let Some(geometry) = self.geometry else {
                        continue;
                    };
                    let (x, y) = geometry.to_pixel(mouse.column, mouse.row);
                    match mouse.kind {
                        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                            return Ok(Input::HoverAt { x, y })
                        }
                        MouseEventKind::Down(MouseButton::Left) => {
                            return Ok(Input::ClickAt { x, y })
                        }
                        _ => {}
                    }
                }
                Event::Resize(..) => return Ok(Input::Redraw),
                _ => {}
            }
        }
    }

    fn render(&mut self, view: &View<'_>) -> Result<(), AppError> {
        let (cols, height) = terminal::size();
        let status_row = height.saturating_sub(1);

        let mut frame: Vec<u8> = Vec::new();
        queue!(frame, Clear(ClearType::All))?;

        let geometry = match self.bitmap_for(view) {
            Some(image) => {
                let geometry = Geometry::fit(image.width(), image.height(), cols, status_row);
                draw_bitmap(&mut frame, image, geometry)?;
                Some(geometry)
            }
            None => {
                draw_text(&mut frame, view, status_row)?;
                None
            }
        };
        self.geometry = geometry;

        draw_status(&mut frame, view, status_row)?;
        self.out.write_all(&frame)?;
        self.out.flush()?;
        Ok(())
    }
}

fn sample(image: &RgbaImage, x: u32, y: u32) -> Color {
    if x >= image.width() || y >= image.height() {
        return Color::Black;
    }
    let [r, g, b, a] = image.get_pixel(x, y).0;
    if a == 0 {
        return Color::Black;
    }
    Color::Rgb { r, g, b }
}

fn draw_bitmap<W: Write>(out: &mut W, image: &RgbaImage, geometry: Geometry) -> io::Result<()> {
    let step = geometry.scale;
    for row in 0..geometry.rows {
        queue!(out, MoveTo(0, row))?;
        let top_y = u32::from(row) * 2 * step;
        for col in 0..geometry.cols {
            let x = u32::from(col) * step;
            queue!(
                out,
                SetForegroundColor(sample(image, x, top_y)),
                SetBackgroundColor(sample(image, x, top_y + step)),
                Print(UPPER_HALF_BLOCK)
            )?;
        }
        queue!(out, ResetColor)?;
    }
    Ok(())
}
