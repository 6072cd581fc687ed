//! Key event types consumed by the modal interpreter.
//!
//! Hosts translate their platform events into `KeyEvent` (a printable
//! character or a named extended key, plus a modifier mask). The `notation`
//! module parses Vim-style key strings such as `"d2w<Esc>"` or `"<C-r>"` into
//! key sequences for scripted replay and tests.

use std::fmt;

pub mod notation;

pub use notation::{KeyParseError, parse_keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Plain printable character with no modifiers.
    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    /// Character chord with Ctrl held.
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub const fn named(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// The printable character when this key carries one and no Ctrl/Alt chord.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) => {
                Some(c)
            }
            _ => None,
        }
    }
}

/// KeyCode enumerates normalized logical key representations consumed by higher layers.
/// Printable input always arrives as `Char`; everything else is an extended key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", notation::format_key(self))
    }
}
