//! Frontends: the surfaces a session is drawn on.
//!
//! The controller only talks to `Frontend`. Three adapters exist:
//! - `plain`: line-oriented stdin/stdout
//! - `screen`: full-screen character cells (default)
//! - `graphical`: the page bitmap with clickable hotspots

pub mod graphical;
pub mod plain;
pub mod screen;
pub mod terminal;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::errors::AppError;
use crate::navigation::{Input, View};

#[async_trait]
pub trait Frontend: Send {
    /// Blocks until the user does something the controller understands.
    async fn next_input(&mut self) -> Result<Input, AppError>;

    fn render(&mut self, view: &View<'_>) -> Result<(), AppError>;
}

/// Key bindings shared by the terminal frontends.
pub(crate) fn map_key(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Input::Quit);
    }

    match key.code {
        KeyCode::Char('q') => Some(Input::Quit),
        KeyCode::Char('p') | KeyCode::Char('h') | KeyCode::Left => Some(Input::Previous),
        KeyCode::Char('n') | KeyCode::Char('l') | KeyCode::Right => Some(Input::Next),
        KeyCode::Char(':') => Some(Input::BeginJump),
        KeyCode::Char(c) => c.to_digit(10).map(|d| Input::Digit(d as u8)),
        KeyCode::Enter => Some(Input::ConfirmJump),
        KeyCode::Esc => Some(Input::CancelJump),
        KeyCode::Backspace => Some(Input::EraseDigit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(Input::Quit));
        assert_eq!(map_key(press(KeyCode::Left)), Some(Input::Previous));
        assert_eq!(map_key(press(KeyCode::Char('h'))), Some(Input::Previous));
        assert_eq!(map_key(press(KeyCode::Char('p'))), Some(Input::Previous));
        assert_eq!(map_key(press(KeyCode::Right)), Some(Input::Next));
        assert_eq!(map_key(press(KeyCode::Char('l'))), Some(Input::Next));
        assert_eq!(map_key(press(KeyCode::Char('n'))), Some(Input::Next));
    }

    #[test]
    fn test_jump_keys() {
        assert_eq!(map_key(press(KeyCode::Char(':'))), Some(Input::BeginJump));
        assert_eq!(map_key(press(KeyCode::Char('7'))), Some(Input::Digit(7)));
        assert_eq!(map_key(press(KeyCode::Enter)), Some(Input::ConfirmJump));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Input::CancelJump));
        assert_eq!(map_key(press(KeyCode::Backspace)), Some(Input::EraseDigit));
    }

    #[test]
    fn test_ctrl_c_quits_and_other_keys_are_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(Input::Quit));
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
        assert_eq!(map_key(press(KeyCode::Tab)), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key), None);
    }
}
