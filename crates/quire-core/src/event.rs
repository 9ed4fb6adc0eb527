#![forbid(unsafe_code)]

//! Canonical host events.
//!
//! The host (a browser shell, a native window, a test harness) translates its
//! own input into these types before handing them to panels and resize boxes.
//! Pointer coordinates are viewport (client) coordinates.
//!
//! # Design Notes
//!
//! - `Event::Scrolled` covers scrolling of the window *and* of any ancestor of
//!   the editor surface; hosts should forward both.
//! - `Event::PointerLeftWindow` is the pointer leaving the window or document,
//!   not an element.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::geometry::{Point, Size};

/// Canonical host event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A pointer (mouse, pen, touch) event.
    Pointer(PointerEvent),

    /// A keyboard event.
    Key(KeyEvent),

    /// The pointer left the window or document.
    PointerLeftWindow,

    /// A context menu was requested at the given viewport position.
    ContextMenu(Point),

    /// Document visibility changed (tab switch, minimise).
    Visibility(Visibility),

    /// The element that owns the interaction gained (`true`) or lost
    /// (`false`) focus.
    Focus(bool),

    /// The window was resized.
    Resize(Size),

    /// The window or an ancestor of the editor surface scrolled.
    Scrolled,

    /// The host editor's selection changed.
    SelectionChanged,
}

impl Event {
    /// Shorthand for a pointer event.
    #[must_use]
    pub const fn pointer(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self::Pointer(PointerEvent::new(kind, x, y))
    }

    /// Shorthand for a plain key press.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,

    /// X coordinate in viewport pixels.
    pub x: f32,

    /// Y coordinate in viewport pixels.
    pub y: f32,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a pointer event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The event position.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down(PointerButton),
    Up(PointerButton),
    Moved,
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

/// Document visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }
}

/// Key codes the interaction layer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}
