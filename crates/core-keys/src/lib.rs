//! Logical key model shared between the host glue and the dispatcher.
//!
//! The host glue observes raw keyboard events on the editor surface and
//! normalizes each one into a [`KeyInput`] before handing it to the
//! dispatcher. Nothing here interprets keys; this crate only fixes the
//! vocabulary (token, named key, modifier mask) and the numeric wire
//! codes the host uses to tell synthetic key events apart from real
//! ones.

use std::fmt;

bitflags::bitflags! {
    /// Modifier state attached to an observed or emitted key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModMask: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
        const META  = 0b0000_1000;
    }
}

/// Non-printable keys the dispatcher cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Escape,
    Enter,
    Backspace,
    Delete,
    Tab,
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
}

/// Bare modifier keys. The host delivers a keydown for the modifier
/// itself before the chord it participates in; the dispatcher must
/// ignore those outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModKey {
    Shift,
    Control,
    Alt,
    Meta,
}

/// Canonical logical key token observed from the host surface.
///
/// `Other` covers keys the host names but the dispatcher has no binding
/// for (function keys, media keys, dead keys reported with an empty
/// name). They flow through the normal unrecognized-key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Char(char),
    Named(NamedKey),
    Modifier(ModKey),
    Other,
}

/// One observed keystroke: token plus live modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub token: KeyToken,
    pub mods: ModMask,
}

impl KeyInput {
    /// Plain (unmodified) key.
    pub fn plain(token: KeyToken) -> Self {
        Self {
            token,
            mods: ModMask::empty(),
        }
    }

    /// Printable character without modifiers. Shifted characters arrive
    /// already uppercased/symbolized by the host, so `SHIFT` is not
    /// implied here.
    pub fn ch(c: char) -> Self {
        Self::plain(KeyToken::Char(c))
    }

    pub fn named(key: NamedKey) -> Self {
        Self::plain(KeyToken::Named(key))
    }

    pub fn with_mods(token: KeyToken, mods: ModMask) -> Self {
        Self { token, mods }
    }

    /// Ctrl chord over a printable character (`<C-o>` and friends).
    pub fn ctrl(c: char) -> Self {
        Self::with_mods(KeyToken::Char(c), ModMask::CTRL)
    }

    /// True when the event is a bare modifier keystroke (no base key).
    pub fn is_bare_modifier(&self) -> bool {
        matches!(self.token, KeyToken::Modifier(_))
    }

    /// True when a non-shift modifier is held. Shift alone never makes
    /// a chord: shifted printables arrive as distinct characters.
    pub fn has_chord_modifier(&self) -> bool {
        self.mods
            .intersects(ModMask::CTRL | ModMask::ALT | ModMask::META)
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(ModMask::CTRL) {
            write!(f, "C-")?;
        }
        if self.mods.contains(ModMask::ALT) {
            write!(f, "A-")?;
        }
        if self.mods.contains(ModMask::META) {
            write!(f, "M-")?;
        }
        match self.token {
            KeyToken::Char(c) => write!(f, "{c}"),
            KeyToken::Named(n) => write!(f, "<{n:?}>"),
            KeyToken::Modifier(m) => write!(f, "<{m:?}>"),
            KeyToken::Other => write!(f, "<Other>"),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Wire codes
// -------------------------------------------------------------------------------------------------
// The host distinguishes real from synthetic key events only by these
// numeric codes, so they must match the platform values exactly.

pub const WIRE_BACKSPACE: u8 = 8;
pub const WIRE_ENTER: u8 = 13;
pub const WIRE_ESC: u8 = 27;
pub const WIRE_END: u8 = 35;
pub const WIRE_HOME: u8 = 36;
pub const WIRE_LEFT: u8 = 37;
pub const WIRE_UP: u8 = 38;
pub const WIRE_RIGHT: u8 = 39;
pub const WIRE_DOWN: u8 = 40;
pub const WIRE_DELETE: u8 = 46;

impl NamedKey {
    /// Numeric key code used on the synthetic-event wire, when the key
    /// has one. `Tab` is observed but never synthesized.
    pub fn wire_code(&self) -> Option<u8> {
        let code = match self {
            NamedKey::Backspace => WIRE_BACKSPACE,
            NamedKey::Enter => WIRE_ENTER,
            NamedKey::Escape => WIRE_ESC,
            NamedKey::End => WIRE_END,
            NamedKey::Home => WIRE_HOME,
            NamedKey::Left => WIRE_LEFT,
            NamedKey::Up => WIRE_UP,
            NamedKey::Right => WIRE_RIGHT,
            NamedKey::Down => WIRE_DOWN,
            NamedKey::Delete => WIRE_DELETE,
            NamedKey::Tab => return None,
        };
        Some(code)
    }
}
