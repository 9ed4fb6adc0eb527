#![forbid(unsafe_code)]

//! Floating panel positioner.
//!
//! A [`FloatingPanel`] owns the visibility lifecycle of one floating panel
//! and recomputes its placement whenever the host reports a trigger.
//!
//! ```text
//! Hidden ──show──▶ Measuring ──tick──▶ Visible
//!   ▲                  │                  │
//!   └──────────────────┴──hide / dismiss──┘
//! ```
//!
//! # Invariants
//!
//! 1. `placement()` is `Some` iff the state is `Measuring` or `Visible`.
//! 2. A panel in `Measuring` is rendered but reported invisible, so the
//!    host can measure it without a flash at the provisional position.
//! 3. Every trigger recomputes the placement from scratch; nothing is
//!    carried over between recomputes except the measured size.
//! 4. After [`dismiss`](FloatingPanel::dismiss) the panel stays hidden until
//!    the next selection change.
//! 5. Listener scopes acquired by [`mount`](FloatingPanel::mount) are
//!    released by [`unmount`](FloatingPanel::unmount) and nowhere else.

use quire_core::event::Event;
use quire_core::geometry::{Rect, Size, Viewport};
use quire_core::scope::{HostGlobals, ListenerScope, ListenerSet};
use quire_layout::{AnchorGeometry, PanelPlacement, PlacementConfig, PlacementConfigError, place};

use crate::dismissal::DismissalOutcome;
use crate::host::HostEditor;

/// Listeners a mounted panel keeps installed.
pub const PANEL_LISTENERS: ListenerSet = ListenerSet::SELECTION_CHANGE
    .union(ListenerSet::WINDOW_RESIZE)
    .union(ListenerSet::SCROLL_CAPTURE);

/// Which kind of panel this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelKind {
    /// Anchored to the selection range.
    Toolbar,
    /// Anchored to the caret.
    CaretMenu,
}

impl PanelKind {
    /// Whether losing editor focus hides the panel regardless of anchor.
    ///
    /// The caret menu keeps itself open: activating one of its items moves
    /// focus out of the editor first.
    pub const fn hides_on_blur(self) -> bool {
        matches!(self, Self::Toolbar)
    }

    /// Default placement config for this kind.
    pub const fn default_config(self) -> PlacementConfig {
        match self {
            Self::Toolbar => PlacementConfig::toolbar(),
            Self::CaretMenu => PlacementConfig::caret_menu(),
        }
    }
}

/// Visibility lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelState {
    #[default]
    Hidden,
    Measuring,
    Visible,
}

/// Host notifications that force a recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelTrigger {
    SelectionChanged,
    WindowResized,
    /// The window or any ancestor of the editor surface scrolled.
    Scrolled,
    FocusChanged,
}

impl PanelTrigger {
    /// The trigger carried by a host event, if any.
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::SelectionChanged => Some(Self::SelectionChanged),
            Event::Resize(_) => Some(Self::WindowResized),
            Event::Scrolled => Some(Self::Scrolled),
            Event::Focus(_) => Some(Self::FocusChanged),
            _ => None,
        }
    }
}

/// What caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "cause", content = "trigger", rename_all = "snake_case"))]
pub enum PanelCause {
    Mount,
    Trigger(PanelTrigger),
    /// The deferred post-mount recompute.
    Tick,
    Dismissed,
    Unmount,
}

/// One positioner step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelTransition {
    pub transition_id: u64,
    pub from: PanelState,
    pub to: PanelState,
    pub cause: PanelCause,
}

impl PanelTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// What the positioner needs to know about the host for one recompute.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelInput {
    pub anchor: Option<AnchorGeometry>,
    pub focused: bool,
}

impl PanelInput {
    #[must_use]
    pub const fn new(anchor: Option<AnchorGeometry>, focused: bool) -> Self {
        Self { anchor, focused }
    }

    /// Anchor the panel to the host's selection.
    pub fn from_selection<H: HostEditor + ?Sized>(host: &H) -> Self {
        Self::new(host.selection_anchor(), host.is_focused())
    }

    /// Anchor the panel to the caret while `active`.
    pub fn from_caret<H: HostEditor + ?Sized>(host: &H, active: bool) -> Self {
        let anchor = if active { host.caret_anchor() } else { None };
        Self::new(anchor, host.is_focused())
    }
}

/// What the presentation layer should render.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelView {
    /// Document-space placement, or `None` when nothing should render.
    pub placement: Option<PanelPlacement>,
    /// `false` while measuring: render, but keep it invisible.
    pub visible: bool,
}

/// How a panel widget responded to a host event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelResponse {
    /// A trigger recomputed the placement.
    Transition(PanelTransition),
    /// A pointer-down went through dismissal.
    Dismissal(DismissalOutcome),
    /// The event is not for this panel.
    Ignored,
}

/// Stateful controller for one floating panel.
#[derive(Debug)]
pub struct FloatingPanel {
    kind: PanelKind,
    config: PlacementConfig,
    state: PanelState,
    placement: Option<PanelPlacement>,
    measured: Option<Size>,
    dismissed: bool,
    listeners: Option<ListenerScope>,
    transition_counter: u64,
}

impl FloatingPanel {
    /// A panel with the default config for `kind`.
    #[must_use]
    pub fn new(kind: PanelKind) -> Self {
        Self {
            kind,
            config: kind.default_config(),
            state: PanelState::Hidden,
            placement: None,
            measured: None,
            dismissed: false,
            listeners: None,
            transition_counter: 0,
        }
    }

    /// A panel with an explicit placement config.
    pub fn with_config(kind: PanelKind, config: PlacementConfig) -> Result<Self, PlacementConfigError> {
        config.validate()?;
        let mut panel = Self::new(kind);
        panel.config = config;
        Ok(panel)
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Current placement (document coordinates).
    pub fn placement(&self) -> Option<PanelPlacement> {
        self.placement
    }

    /// Measuring or visible.
    pub fn is_shown(&self) -> bool {
        self.state != PanelState::Hidden
    }

    pub fn is_mounted(&self) -> bool {
        self.listeners.is_some()
    }

    /// Whether an outside click has latched the panel hidden.
    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn view(&self) -> PanelView {
        PanelView {
            placement: self.placement,
            visible: self.state == PanelState::Visible,
        }
    }

    /// Size used for placement: the measured one, else the fallback.
    pub fn panel_size(&self) -> Size {
        self.config.panel_size(self.measured)
    }

    /// Rendered panel bounds in document coordinates.
    pub fn panel_rect(&self) -> Option<Rect> {
        self.placement
            .map(|placement| placement.rect(self.panel_size().height))
    }

    /// Record the panel's rendered size. Takes effect on the next
    /// recompute.
    pub fn set_measured_size(&mut self, size: Size) {
        if size.is_usable() {
            self.measured = Some(size);
        }
    }

    /// Install the panel's listeners and compute a provisional placement.
    pub fn mount(
        &mut self,
        globals: &mut HostGlobals,
        input: PanelInput,
        viewport: &Viewport,
    ) -> PanelTransition {
        if self.listeners.is_none() {
            self.listeners = Some(globals.listen(PANEL_LISTENERS));
        }
        self.recompute(PanelCause::Mount, input, viewport)
    }

    /// Recompute after a host trigger.
    pub fn update(
        &mut self,
        trigger: PanelTrigger,
        input: PanelInput,
        viewport: &Viewport,
    ) -> PanelTransition {
        if trigger == PanelTrigger::SelectionChanged {
            self.dismissed = false;
        }
        self.recompute(PanelCause::Trigger(trigger), input, viewport)
    }

    /// Deferred recompute after the first paint. Only meaningful while
    /// measuring.
    pub fn tick(&mut self, input: PanelInput, viewport: &Viewport) -> PanelTransition {
        if self.state != PanelState::Measuring {
            return self.transition(PanelCause::Tick, self.state);
        }
        self.recompute(PanelCause::Tick, input, viewport)
    }

    /// Hide until the next selection change.
    pub fn dismiss(&mut self) -> PanelTransition {
        self.dismissed = true;
        self.hide(PanelCause::Dismissed)
    }

    /// Remove listeners and hide.
    pub fn unmount(&mut self, globals: &mut HostGlobals) -> PanelTransition {
        if let Some(scope) = self.listeners.take() {
            globals.unlisten(scope);
        }
        self.hide(PanelCause::Unmount)
    }

    fn recompute(&mut self, cause: PanelCause, input: PanelInput, viewport: &Viewport) -> PanelTransition {
        let placement = if !self.is_mounted() || self.dismissed {
            None
        } else if self.kind.hides_on_blur() && !input.focused {
            None
        } else {
            input
                .anchor
                .and_then(|anchor| place(&anchor, self.measured, viewport, &self.config))
        };

        let Some(placement) = placement else {
            return self.hide(cause);
        };

        let next = match (self.state, cause) {
            (PanelState::Measuring, PanelCause::Tick) => PanelState::Visible,
            (PanelState::Measuring, _) => PanelState::Measuring,
            (PanelState::Visible, _) => PanelState::Visible,
            (PanelState::Hidden, _) if self.measured.is_some() => PanelState::Visible,
            (PanelState::Hidden, _) => PanelState::Measuring,
        };
        self.placement = Some(placement);
        self.transition(cause, next)
    }

    fn hide(&mut self, cause: PanelCause) -> PanelTransition {
        self.placement = None;
        self.transition(cause, PanelState::Hidden)
    }

    fn transition(&mut self, cause: PanelCause, to: PanelState) -> PanelTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        let from = std::mem::replace(&mut self.state, to);
        if from != to {
            quire_core::debug!(kind = ?self.kind, ?from, ?to, ?cause, "panel transition");
        }
        PanelTransition {
            transition_id: self.transition_counter,
            from,
            to,
            cause,
        }
    }
}
