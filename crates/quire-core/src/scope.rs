#![forbid(unsafe_code)]

//! Scoped acquisition of process-wide interaction effects.
//!
//! Two kinds of state are global to the page rather than owned by any one
//! widget: event-listener registrations (pointer, scroll, resize, visibility,
//! keyboard) and the body-level cursor / text-selection styling applied while
//! a drag is in progress. [`HostGlobals`] is the single owner of both. Widgets
//! acquire a [`ListenerScope`] or [`StyleOverride`] when they enter an active
//! state and hand it back on *every* exit transition.
//!
//! Neither token releases itself on drop. Release is an explicit call made by
//! the state machine that acquired it; a missed release stays visible in
//! [`HostGlobals::listeners`].
//!
//! The host mirrors this state onto the real platform: it keeps the listeners
//! in [`ListenerRegistry::installed`] attached and applies
//! [`HostGlobals::style`] to the document body.

use std::collections::BTreeMap;

use bitflags::bitflags;

bitflags! {
    /// Kinds of global listeners a widget may need.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ListenerSet: u16 {
        const SELECTION_CHANGE = 1 << 0;
        const WINDOW_RESIZE    = 1 << 1;
        /// Scroll on the window or any ancestor (capture phase).
        const SCROLL_CAPTURE   = 1 << 2;
        const POINTER_DOWN     = 1 << 3;
        const POINTER_MOVE     = 1 << 4;
        const POINTER_UP       = 1 << 5;
        /// Pointer leaving the window or document.
        const POINTER_LEAVE    = 1 << 6;
        const VISIBILITY       = 1 << 7;
        const CONTEXT_MENU     = 1 << 8;
        const KEY_DOWN         = 1 << 9;
    }
}

/// Handle for a set of installed listeners. Must be passed back to
/// [`HostGlobals::unlisten`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "listener scopes must be released explicitly"]
pub struct ListenerScope {
    id: u64,
    kinds: ListenerSet,
}

impl ListenerScope {
    /// The listener kinds held by this scope.
    pub fn kinds(&self) -> ListenerSet {
        self.kinds
    }
}

/// Bookkeeping for installed listener scopes.
#[derive(Debug, Default, Clone)]
pub struct ListenerRegistry {
    next_id: u64,
    active: BTreeMap<u64, ListenerSet>,
}

impl ListenerRegistry {
    fn acquire(&mut self, kinds: ListenerSet) -> ListenerScope {
        self.next_id = self.next_id.saturating_add(1);
        let id = self.next_id;
        self.active.insert(id, kinds);
        ListenerScope { id, kinds }
    }

    fn release(&mut self, scope: ListenerScope) -> bool {
        self.active.remove(&scope.id).is_some()
    }

    /// Union of every listener kind currently installed.
    pub fn installed(&self) -> ListenerSet {
        self.active
            .values()
            .fold(ListenerSet::empty(), |acc, kinds| acc | *kinds)
    }

    /// Number of live scopes that include every kind in `kinds`.
    pub fn count(&self, kinds: ListenerSet) -> usize {
        self.active.values().filter(|k| k.contains(kinds)).count()
    }

    /// Number of live scopes.
    pub fn scopes(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Body cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CursorIcon {
    /// Whatever the page styles say.
    #[default]
    Auto,
    Pointer,
    /// Diagonal resize (`nwse-resize`).
    NwseResize,
    EwResize,
}

/// Body text-selection behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UserSelect {
    #[default]
    Auto,
    /// Text selection suppressed.
    None,
}

/// Global styling applied to the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalStyle {
    pub cursor: CursorIcon,
    pub user_select: UserSelect,
}

impl GlobalStyle {
    /// Styling used while a resize handle is dragged.
    pub const DRAG_RESIZE: Self = Self {
        cursor: CursorIcon::NwseResize,
        user_select: UserSelect::None,
    };
}

/// Record of a style override; restoring it reinstates the captured style.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "style overrides must be restored explicitly"]
pub struct StyleOverride {
    previous: GlobalStyle,
}

impl StyleOverride {
    /// The style that was active before the override.
    pub fn previous(&self) -> GlobalStyle {
        self.previous
    }
}

/// Owner of page-global listener registrations and body styling.
#[derive(Debug, Default, Clone)]
pub struct HostGlobals {
    style: GlobalStyle,
    listeners: ListenerRegistry,
    overrides: usize,
}

impl HostGlobals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing body style (the host's baseline).
    #[must_use]
    pub fn with_style(style: GlobalStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Current body style.
    pub fn style(&self) -> GlobalStyle {
        self.style
    }

    /// Listener bookkeeping.
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Install listeners for `kinds`.
    pub fn listen(&mut self, kinds: ListenerSet) -> ListenerScope {
        let scope = self.listeners.acquire(kinds);
        crate::trace!(scope = scope.id, kinds = ?kinds, "listeners installed");
        scope
    }

    /// Remove the listeners held by `scope`.
    ///
    /// Returns `false` if the scope was not live.
    pub fn unlisten(&mut self, scope: ListenerScope) -> bool {
        crate::trace!(scope = scope.id, kinds = ?scope.kinds, "listeners removed");
        self.listeners.release(scope)
    }

    /// Apply `style` to the body, remembering what it replaced.
    pub fn override_style(&mut self, style: GlobalStyle) -> StyleOverride {
        let previous = std::mem::replace(&mut self.style, style);
        self.overrides = self.overrides.saturating_add(1);
        StyleOverride { previous }
    }

    /// Reinstate the style captured by `guard`.
    pub fn restore_style(&mut self, guard: StyleOverride) {
        self.style = guard.previous;
        self.overrides = self.overrides.saturating_sub(1);
    }

    /// Number of overrides not yet restored.
    pub fn active_overrides(&self) -> usize {
        self.overrides
    }

    /// True when nothing is installed or overridden.
    pub fn is_quiescent(&self) -> bool {
        self.listeners.is_empty() && self.overrides == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_and_unlisten_round_trip() {
        let mut globals = HostGlobals::new();
        let scope = globals.listen(ListenerSet::POINTER_MOVE | ListenerSet::POINTER_UP);
        assert_eq!(
            globals.listeners().installed(),
            ListenerSet::POINTER_MOVE | ListenerSet::POINTER_UP
        );
        assert!(globals.unlisten(scope));
        assert!(globals.listeners().is_empty());
        assert!(globals.is_quiescent());
    }

    #[test]
    fn installed_is_union_of_live_scopes() {
        let mut globals = HostGlobals::new();
        let a = globals.listen(ListenerSet::SCROLL_CAPTURE);
        let b = globals.listen(ListenerSet::SCROLL_CAPTURE | ListenerSet::WINDOW_RESIZE);
        assert_eq!(globals.listeners().count(ListenerSet::SCROLL_CAPTURE), 2);
        assert!(globals.unlisten(a));
        assert_eq!(
            globals.listeners().installed(),
            ListenerSet::SCROLL_CAPTURE | ListenerSet::WINDOW_RESIZE
        );
        assert!(globals.unlisten(b));
        assert_eq!(globals.listeners().installed(), ListenerSet::empty());
    }

    #[test]
    fn override_restores_previous_style() {
        let baseline = GlobalStyle {
            cursor: CursorIcon::Pointer,
            user_select: UserSelect::Auto,
        };
        let mut globals = HostGlobals::with_style(baseline);
        let guard = globals.override_style(GlobalStyle::DRAG_RESIZE);
        assert_eq!(globals.style(), GlobalStyle::DRAG_RESIZE);
        assert_eq!(guard.previous(), baseline);
        assert_eq!(globals.active_overrides(), 1);

        globals.restore_style(guard);
        assert_eq!(globals.style(), baseline);
        assert!(globals.is_quiescent());
    }

    #[test]
    fn scope_ids_are_distinct() {
        let mut globals = HostGlobals::new();
        let a = globals.listen(ListenerSet::KEY_DOWN);
        let b = globals.listen(ListenerSet::KEY_DOWN);
        assert_ne!(a, b);
        assert_eq!(globals.listeners().scopes(), 2);
        assert!(globals.unlisten(b));
        assert!(globals.unlisten(a));
    }
}
