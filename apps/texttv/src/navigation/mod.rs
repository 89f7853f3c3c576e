// Page/subpage navigation: inputs, the controller state machine and the render loop.

pub mod controller;
pub mod view;

use tracing::{info, warn};

pub use controller::NavigationController;
pub use view::View;

use crate::errors::AppError;
use crate::frontend::Frontend;
use crate::page_client::PageSource;

/// Input events, independent of where they come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    Previous,
    Next,
    /// Opens the page-jump prompt.
    BeginJump,
    Digit(u8),
    ConfirmJump,
    CancelJump,
    EraseDigit,
    /// Pointer position in bitmap pixels.
    HoverAt { x: u32, y: u32 },
    ClickAt { x: u32, y: u32 },
    /// Nothing changed; draw again.
    Redraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs the session until the user quits. The start page must already be loaded.
pub async fn run<S, F>(
    controller: &mut NavigationController<S>,
    frontend: &mut F,
) -> Result<(), AppError>
where
    S: PageSource,
    F: Frontend + ?Sized,
{
    loop {
        if controller.fetch_pending() {
            if let Err(e) = controller.sync().await {
                warn!(
                    "page fetch failed, keeping page {}: {e}",
                    controller.state().current_page
                );
            }
        }
        frontend.render(&controller.view())?;

        let input = frontend.next_input().await?;
        if controller.handle(input) == Flow::Quit {
            info!("quit");
            return Ok(());
        }
    }
}
