//! Keyboard shortcuts
//!
//! Space spins the wheel and Escape dismisses the winner modal. Space is
//! left alone while the user is typing into a text field.

use crate::app::state::Mode;

/// Keys the widget reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Escape,
    Other,
}

impl Key {
    /// Maps a DOM-style `KeyboardEvent.code` name to a key
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" => Key::Space,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Where keyboard focus currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Page body or a button
    Page,
    /// A textarea or input field
    TextInput,
}

/// Actions a key press can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Spin,
    CloseModal,
}

/// Resolves a key press to a shortcut, if any applies
///
/// # Arguments
/// * `key` - Pressed key
/// * `focus` - Current focus target
/// * `mode` - Visible surface; spinning only works on the wheel
/// * `spinning` - Whether a spin is already running
pub fn resolve(key: Key, focus: Focus, mode: Mode, spinning: bool) -> Option<Shortcut> {
    match key {
        Key::Space if focus == Focus::Page && mode == Mode::Wheel && !spinning => Some(Shortcut::Spin),
        Key::Escape => Some(Shortcut::CloseModal),
        _ => None,
    }
}
