#![forbid(unsafe_code)]

//! Pointer-driven resize of embedded boxes.
//!
//! A [`ResizeBox`] runs the drag lifecycle for one resizable element (an
//! image, a video player). It never writes the element's size itself: it
//! emits proposals and the embedding document decides what to store.
//!
//! ```text
//! Idle ──pointer-down on handle (box selected)──▶ Dragging
//!   ▲                                               │
//!   └── pointer-up · pointer leaves window ─────────┤
//!       visibility hidden · context menu            │
//!       Escape · handle blur · unmount ─────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. A session exists iff the state is `Dragging`.
//! 2. Entering `Dragging` installs the drag listeners and the resize cursor
//!    with text selection suppressed; every exit path removes both.
//! 3. At most one proposal is pending per animation frame; a newer move
//!    replaces it.
//! 4. Outside a session the only proposals are the settle emitted when a
//!    fill-width box is grabbed, the pending proposal committed on
//!    pointer-up, and [`toggle_fill`](ResizeBox::toggle_fill).
//! 5. Width and height are clamped independently after the aspect ratio
//!    is applied, so a clamped box can drift from the locked ratio.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Pointer-up never arrives (focus left the window) | Pointer-leave, visibility, and blur all end the session |
//! | Grab on a box whose measured size is unusable | `max_width` / `max_height` become the start size |
//! | Stored pixel size is zero, negative, or not finite | Measured size (or the fallback) seeds the session instead |
//! | Context menu mid-drag | Session ends; the host must suppress the menu |

use std::fmt;

use quire_core::event::{Event, KeyCode, PointerButton, PointerEventKind, Visibility};
use quire_core::frame::FrameCoalescer;
use quire_core::geometry::{Point, Size};
use quire_core::scope::{GlobalStyle, HostGlobals, ListenerScope, ListenerSet, StyleOverride};

/// Listeners installed for the duration of a drag.
pub const DRAG_LISTENERS: ListenerSet = ListenerSet::POINTER_MOVE
    .union(ListenerSet::POINTER_UP)
    .union(ListenerSet::POINTER_LEAVE)
    .union(ListenerSet::VISIBILITY)
    .union(ListenerSet::CONTEXT_MENU)
    .union(ListenerSet::KEY_DOWN);

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Box width.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoxWidth {
    Px(f32),
    /// Full container width (`100%`).
    Fill,
}

/// Box height.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoxHeight {
    Px(f32),
    /// Determined by content.
    Auto,
}

/// Stored dimensions of a resizable element.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxDimensions {
    pub width: BoxWidth,
    pub height: BoxHeight,
}

impl BoxDimensions {
    #[must_use]
    pub const fn px(width: f32, height: f32) -> Self {
        Self {
            width: BoxWidth::Px(width),
            height: BoxHeight::Px(height),
        }
    }

    /// Full width, content height.
    #[must_use]
    pub const fn fill() -> Self {
        Self {
            width: BoxWidth::Fill,
            height: BoxHeight::Auto,
        }
    }

    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::px(size.width, size.height)
    }

    pub fn is_fill(&self) -> bool {
        self.width == BoxWidth::Fill
    }

    /// Pixel size, if both dimensions are pixels.
    pub fn as_size(&self) -> Option<Size> {
        match (self.width, self.height) {
            (BoxWidth::Px(w), BoxHeight::Px(h)) => Some(Size::new(w, h)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Resize bounds and aspect lock.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResizeConfig {
    pub min_width: f32,
    pub min_height: f32,
    pub max_width: f32,
    pub max_height: f32,
    /// Keep the start aspect ratio while dragging.
    pub aspect_ratio: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            min_width: 50.0,
            min_height: 30.0,
            max_width: 1200.0,
            max_height: 800.0,
            aspect_ratio: false,
        }
    }
}

impl ResizeConfig {
    #[must_use]
    pub fn with_min(mut self, width: f32, height: f32) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    #[must_use]
    pub fn with_max(mut self, width: f32, height: f32) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    #[must_use]
    pub fn with_aspect_ratio(mut self, locked: bool) -> Self {
        self.aspect_ratio = locked;
        self
    }

    pub fn validate(&self) -> Result<(), ResizeConfigError> {
        for (axis, min, max) in [
            (Axis::Width, self.min_width, self.max_width),
            (Axis::Height, self.min_height, self.max_height),
        ] {
            if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= 0.0 {
                return Err(ResizeConfigError::InvalidBound { axis, min, max });
            }
            if min > max {
                return Err(ResizeConfigError::InvertedBounds { axis, min, max });
            }
        }
        Ok(())
    }

    /// Clamp each dimension into its bounds.
    ///
    /// Never panics, even for a config that fails [`validate`](Self::validate):
    /// with inverted bounds the maximum wins, and a NaN bound is ignored.
    pub fn clamp(&self, size: Size) -> Size {
        Size::new(
            size.width.max(self.min_width).min(self.max_width),
            size.height.max(self.min_height).min(self.max_height),
        )
    }

    /// Start size when nothing usable was measured.
    pub fn fallback_size(&self) -> Size {
        Size::new(self.max_width, self.max_height)
    }
}

/// Dimension named in a config error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => f.write_str("width"),
            Self::Height => f.write_str("height"),
        }
    }
}

/// Resize configuration errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeConfigError {
    InvalidBound { axis: Axis, min: f32, max: f32 },
    InvertedBounds { axis: Axis, min: f32, max: f32 },
}

impl fmt::Display for ResizeConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBound { axis, min, max } => write!(
                f,
                "{axis} bounds must be finite and positive (min {min}, max {max})"
            ),
            Self::InvertedBounds { axis, min, max } => {
                write!(f, "{axis} min {min} exceeds max {max}")
            }
        }
    }
}

impl std::error::Error for ResizeConfigError {}

// ---------------------------------------------------------------------------
// Proposal math
// ---------------------------------------------------------------------------

/// Size for a pointer delta, before clamping.
///
/// Width follows `dx`. With the aspect lock, height is derived from that
/// width; otherwise it follows `dy`.
pub fn raw_proposal(start: Size, dx: f32, dy: f32, aspect_ratio: bool) -> Size {
    let width = start.width + dx;
    let height = if aspect_ratio {
        width * start.height / start.width
    } else {
        start.height + dy
    };
    Size::new(width, height)
}

fn usable_px(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Clamped size for a pointer delta.
///
/// ```
/// use quire_core::geometry::Size;
/// use quire_widgets::resize::{proposed_size, ResizeConfig};
///
/// let config = ResizeConfig::default().with_aspect_ratio(true);
/// let size = proposed_size(Size::new(400.0, 225.0), 100.0, 0.0, &config);
/// assert_eq!(size, Size::new(500.0, 281.25));
/// ```
pub fn proposed_size(start: Size, dx: f32, dy: f32, config: &ResizeConfig) -> Size {
    config.clamp(raw_proposal(start, dx, dy, config.aspect_ratio))
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// The data of an active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResizeSession {
    pointer_start: Point,
    start_size: Size,
}

impl ResizeSession {
    pub fn pointer_start(&self) -> Point {
        self.pointer_start
    }

    pub fn start_size(&self) -> Size {
        self.start_size
    }
}

/// Drag lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "snake_case"))]
pub enum ResizeState {
    #[default]
    Idle,
    Dragging(ResizeSession),
}

impl ResizeState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResizeExitReason {
    PointerUp,
    PointerLeftWindow,
    VisibilityHidden,
    /// The host must also cancel the menu's default action.
    ContextMenu,
    Escape,
    HandleBlur,
    Unmounted,
}

/// Events that were safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResizeNoopReason {
    /// The handle only exists while the box is selected.
    NotSelected,
    NonPrimaryButton,
    IdleWithoutActiveDrag,
    DragAlreadyInProgress,
    NothingPending,
    UnrelatedEvent,
}

/// What one step did.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "effect", rename_all = "snake_case"))]
pub enum ResizeEffect {
    /// A session began. `settled` carries the pixel size a fill-width box
    /// must adopt before the drag continues.
    Started {
        start_size: Size,
        settled: Option<BoxDimensions>,
    },
    /// A move was queued for the next frame.
    Scheduled { pending: Size, superseded: bool },
    /// A frame flushed the pending move.
    Proposed { proposal: BoxDimensions },
    /// The session ended on pointer-up; any pending move was committed.
    Committed { proposal: Option<BoxDimensions> },
    /// The session ended abnormally; any pending move was discarded.
    Canceled {
        reason: ResizeExitReason,
        discarded: Option<Size>,
    },
    Noop { reason: ResizeNoopReason },
}

impl ResizeEffect {
    /// The dimensions the host should apply, if this step produced any.
    pub fn proposal(&self) -> Option<BoxDimensions> {
        match self {
            Self::Started { settled, .. } => *settled,
            Self::Proposed { proposal } => Some(*proposal),
            Self::Committed { proposal } => *proposal,
            _ => None,
        }
    }
}

/// Simple phase tag for transition records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResizePhase {
    Idle,
    Dragging,
}

impl From<&ResizeState> for ResizePhase {
    fn from(state: &ResizeState) -> Self {
        match state {
            ResizeState::Idle => Self::Idle,
            ResizeState::Dragging(_) => Self::Dragging,
        }
    }
}

/// One lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResizeTransition {
    pub transition_id: u64,
    pub from: ResizePhase,
    pub to: ResizePhase,
    pub effect: ResizeEffect,
}

impl ResizeTransition {
    /// Whether the host must cancel the triggering event's default action.
    pub fn suppresses_default(&self) -> bool {
        matches!(
            self.effect,
            ResizeEffect::Canceled {
                reason: ResizeExitReason::ContextMenu,
                ..
            }
        )
    }
}

/// What the presentation layer needs for feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResizeStatus {
    pub dragging: bool,
    pub is_full_width: bool,
}

#[derive(Debug)]
struct DragEffects {
    listeners: ListenerScope,
    style: StyleOverride,
}

/// Drag lifecycle for one resizable element.
#[derive(Debug)]
pub struct ResizeBox {
    config: ResizeConfig,
    state: ResizeState,
    frames: FrameCoalescer<Size>,
    effects: Option<DragEffects>,
    proposal: Option<BoxDimensions>,
    transition_counter: u64,
}

impl Default for ResizeBox {
    fn default() -> Self {
        Self {
            config: ResizeConfig::default(),
            state: ResizeState::Idle,
            frames: FrameCoalescer::new(),
            effects: None,
            proposal: None,
            transition_counter: 0,
        }
    }
}

impl ResizeBox {
    pub fn new(config: ResizeConfig) -> Result<Self, ResizeConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    pub fn state(&self) -> ResizeState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Latest proposal emitted (settle, frame, commit, or fill toggle).
    pub fn proposal(&self) -> Option<BoxDimensions> {
        self.proposal
    }

    /// Move awaiting the next frame.
    pub fn pending(&self) -> Option<Size> {
        self.frames.pending().copied()
    }

    pub fn status(&self, current: &BoxDimensions) -> ResizeStatus {
        ResizeStatus {
            dragging: self.is_dragging(),
            is_full_width: current.is_fill(),
        }
    }

    /// Switch the box to full width. Does not touch the drag lifecycle.
    pub fn toggle_fill(&mut self) -> BoxDimensions {
        let fill = BoxDimensions::fill();
        self.proposal = Some(fill);
        fill
    }

    /// Pointer-down on the resize handle.
    ///
    /// `measured` is the element's rendered size; it seeds the session when
    /// the stored size is not in pixels.
    pub fn pointer_down(
        &mut self,
        position: Point,
        button: PointerButton,
        selected: bool,
        current: &BoxDimensions,
        measured: Option<Size>,
        globals: &mut HostGlobals,
    ) -> ResizeTransition {
        if self.is_dragging() {
            return self.noop(ResizeNoopReason::DragAlreadyInProgress);
        }
        if !selected {
            return self.noop(ResizeNoopReason::NotSelected);
        }
        if button != PointerButton::Primary {
            return self.noop(ResizeNoopReason::NonPrimaryButton);
        }

        let measured = measured.filter(Size::is_usable);
        let fallback = self.config.fallback_size();
        let width = match current.width {
            BoxWidth::Px(w) if usable_px(w) => w,
            _ => measured.map_or(fallback.width, |m| m.width),
        };
        let height = match (current.width, current.height) {
            (BoxWidth::Px(_), BoxHeight::Px(h)) if usable_px(h) => h,
            _ => measured.map_or(fallback.height, |m| m.height),
        };
        let start_size = Size::new(width, height);
        let settled = current.is_fill().then(|| BoxDimensions::from_size(start_size));
        if settled.is_some() {
            self.proposal = settled;
        }

        self.effects = Some(DragEffects {
            listeners: globals.listen(DRAG_LISTENERS),
            style: globals.override_style(GlobalStyle::DRAG_RESIZE),
        });
        self.frames.cancel();
        quire_core::debug!(
            width = start_size.width,
            height = start_size.height,
            fill = settled.is_some(),
            "resize session started"
        );
        self.step(
            ResizeState::Dragging(ResizeSession {
                pointer_start: position,
                start_size,
            }),
            ResizeEffect::Started {
                start_size,
                settled,
            },
        )
    }

    /// Feed a host event to an active session.
    pub fn handle_event(&mut self, event: &Event, globals: &mut HostGlobals) -> ResizeTransition {
        let ResizeState::Dragging(session) = self.state else {
            return self.noop(ResizeNoopReason::IdleWithoutActiveDrag);
        };
        match event {
            Event::Pointer(pointer) => match pointer.kind {
                PointerEventKind::Moved => self.schedule(session, pointer.position()),
                PointerEventKind::Up(_) => self.commit(globals),
                PointerEventKind::Down(_) => self.noop(ResizeNoopReason::DragAlreadyInProgress),
            },
            Event::PointerLeftWindow => self.cancel(ResizeExitReason::PointerLeftWindow, globals),
            Event::Visibility(Visibility::Hidden) => {
                self.cancel(ResizeExitReason::VisibilityHidden, globals)
            }
            Event::ContextMenu(_) => self.cancel(ResizeExitReason::ContextMenu, globals),
            Event::Key(key) if key.code == KeyCode::Escape => {
                self.cancel(ResizeExitReason::Escape, globals)
            }
            Event::Focus(false) => self.cancel(ResizeExitReason::HandleBlur, globals),
            _ => self.noop(ResizeNoopReason::UnrelatedEvent),
        }
    }

    /// Animation-frame callback: apply the latest pending move.
    pub fn animation_frame(&mut self) -> ResizeTransition {
        if !self.is_dragging() {
            return self.noop(ResizeNoopReason::IdleWithoutActiveDrag);
        }
        match self.frames.on_frame() {
            Some(size) => {
                let proposal = BoxDimensions::from_size(size);
                self.proposal = Some(proposal);
                self.step(self.state, ResizeEffect::Proposed { proposal })
            }
            None => self.noop(ResizeNoopReason::NothingPending),
        }
    }

    /// Tear down: ends any session as `Unmounted`.
    pub fn unmount(&mut self, globals: &mut HostGlobals) -> ResizeTransition {
        if !self.is_dragging() {
            return self.noop(ResizeNoopReason::IdleWithoutActiveDrag);
        }
        self.cancel(ResizeExitReason::Unmounted, globals)
    }

    fn schedule(&mut self, session: ResizeSession, at: Point) -> ResizeTransition {
        let (dx, dy) = at.delta_from(session.pointer_start);
        let pending = proposed_size(session.start_size, dx, dy, &self.config);
        let superseded = self.frames.schedule(pending);
        if superseded {
            quire_core::trace!(
                superseded = self.frames.superseded_count(),
                "resize move superseded before frame"
            );
        }
        self.step(self.state, ResizeEffect::Scheduled { pending, superseded })
    }

    fn commit(&mut self, globals: &mut HostGlobals) -> ResizeTransition {
        let proposal = self.frames.cancel().map(BoxDimensions::from_size);
        if proposal.is_some() {
            self.proposal = proposal;
        }
        self.end_session(globals);
        quire_core::debug!(committed = proposal.is_some(), "resize session ended on pointer-up");
        self.step(ResizeState::Idle, ResizeEffect::Committed { proposal })
    }

    fn cancel(&mut self, reason: ResizeExitReason, globals: &mut HostGlobals) -> ResizeTransition {
        let discarded = self.frames.cancel();
        self.end_session(globals);
        quire_core::debug!(?reason, discarded = discarded.is_some(), "resize session canceled");
        self.step(ResizeState::Idle, ResizeEffect::Canceled { reason, discarded })
    }

    fn end_session(&mut self, globals: &mut HostGlobals) {
        if let Some(effects) = self.effects.take() {
            globals.unlisten(effects.listeners);
            globals.restore_style(effects.style);
        }
    }

    fn noop(&mut self, reason: ResizeNoopReason) -> ResizeTransition {
        self.step(self.state, ResizeEffect::Noop { reason })
    }

    fn step(&mut self, to: ResizeState, effect: ResizeEffect) -> ResizeTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        let from = ResizePhase::from(&self.state);
        self.state = to;
        ResizeTransition {
            transition_id: self.transition_counter,
            from,
            to: ResizePhase::from(&self.state),
            effect,
        }
    }
}
