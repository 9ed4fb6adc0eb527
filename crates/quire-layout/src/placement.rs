#![forbid(unsafe_code)]

//! Clamped placement of floating panels around an editor anchor.
//!
//! Everything here is pure: given the anchor geometry, the panel's measured
//! size, and the viewport, compute where the panel goes.
//!
//! # Invariants
//!
//! 1. A placement is only produced for a live anchor; a degenerate anchor
//!    (non-finite, or no extent at all) yields `None`.
//! 2. Range anchors prefer centring and fall back to left- then
//!    right-alignment; the resolved left edge is never below `padding`.
//! 3. Point anchors are always left-aligned to the anchor and clamped into
//!    `[padding, viewport.width - width - padding]`.
//! 4. Clamp checks run in viewport coordinates; the scroll offset is added
//!    to the result, so placements are document coordinates.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Panel wider than the viewport | Width clamped to `viewport.width - 2·padding` |
//! | No room above or below | Panel overlaps the anchor, pinned to the viewport edge |
//! | Panel size unknown (not yet painted) | `PlacementConfig::fallback_panel` is used |

use std::fmt;

use quire_core::geometry::{Rect, Size, Viewport};

/// Gap between the panel and the anchor or viewport edge.
pub const DEFAULT_PADDING: f32 = 8.0;

/// Panel size assumed before the panel has been measured.
pub const FALLBACK_PANEL_SIZE: Size = Size::new(200.0, 40.0);

/// Where a panel is anchored, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum AnchorGeometry {
    /// A text selection, described by the caret rectangles at its two ends.
    Range { start: Rect, end: Rect },
    /// A single caret position.
    Point { rect: Rect },
}

impl AnchorGeometry {
    #[must_use]
    pub const fn range(start: Rect, end: Rect) -> Self {
        Self::Range { start, end }
    }

    #[must_use]
    pub const fn point(rect: Rect) -> Self {
        Self::Point { rect }
    }

    /// Bounding box of the anchor.
    ///
    /// For a range this spans from the leftmost to the rightmost edge of the
    /// two end rectangles and from the higher top to the lower bottom.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Range { start, end } => start.union(end),
            Self::Point { rect } => *rect,
        }
    }

    /// True when no placement may be derived from this anchor.
    ///
    /// A collapsed range (both ends at the same caret) is an empty selection
    /// and is degenerate; a [`Point`](Self::Point) caret with line height is
    /// not.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Range { start, end } => {
                !start.is_finite() || !end.is_finite() || start == end || self.bounds().is_point()
            }
            Self::Point { rect } => !rect.is_finite() || rect.is_point(),
        }
    }
}

/// Which side of the anchor the panel should try first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VerticalPreference {
    #[default]
    Above,
    Below,
}

/// Resolved vertical side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VerticalPlacement {
    Above,
    Below,
}

/// Resolved horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HorizontalMode {
    /// Centred on the anchor.
    Center,
    /// Left edge aligned to the anchor's left edge.
    Left,
    /// Right edge aligned to the anchor's right edge.
    Right,
}

/// A fully resolved panel position, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelPlacement {
    pub top: f32,
    /// Left edge of the panel (not its centre, even in `Center` mode).
    pub left: f32,
    pub placement: VerticalPlacement,
    pub horizontal_mode: HorizontalMode,
    /// Panel width after clamping to the viewport.
    pub clamped_width: f32,
}

impl PanelPlacement {
    /// The panel's rectangle for a panel of the given height.
    pub fn rect(&self, height: f32) -> Rect {
        Rect::new(self.left, self.top, self.clamped_width, height)
    }
}

/// Placement configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementConfig {
    /// Gap kept between panel, anchor, and viewport edges.
    pub padding: f32,
    /// Size assumed until the panel reports its measured size.
    pub fallback_panel: Size,
    /// Side tried first.
    pub vertical: VerticalPreference,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self::toolbar()
    }
}

impl PlacementConfig {
    /// Defaults for a selection toolbar: prefer above.
    #[must_use]
    pub const fn toolbar() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            fallback_panel: FALLBACK_PANEL_SIZE,
            vertical: VerticalPreference::Above,
        }
    }

    /// Defaults for a caret menu: prefer below.
    #[must_use]
    pub const fn caret_menu() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            fallback_panel: FALLBACK_PANEL_SIZE,
            vertical: VerticalPreference::Below,
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_fallback_panel(mut self, size: Size) -> Self {
        self.fallback_panel = size;
        self
    }

    #[must_use]
    pub fn with_vertical(mut self, preference: VerticalPreference) -> Self {
        self.vertical = preference;
        self
    }

    /// Reject configurations that would make every placement meaningless.
    pub fn validate(&self) -> Result<(), PlacementConfigError> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(PlacementConfigError::InvalidPadding {
                padding: self.padding,
            });
        }
        if !self.fallback_panel.is_usable() {
            return Err(PlacementConfigError::InvalidFallbackSize {
                size: self.fallback_panel,
            });
        }
        Ok(())
    }

    /// The measured size if it is usable, else the fallback.
    pub fn panel_size(&self, measured: Option<Size>) -> Size {
        measured
            .filter(Size::is_usable)
            .unwrap_or(self.fallback_panel)
    }
}

/// Placement configuration errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementConfigError {
    InvalidPadding { padding: f32 },
    InvalidFallbackSize { size: Size },
}

impl fmt::Display for PlacementConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPadding { padding } => {
                write!(f, "placement padding must be finite and >= 0 (got {padding})")
            }
            Self::InvalidFallbackSize { size } => write!(
                f,
                "fallback panel size must be positive (got {}x{})",
                size.width, size.height
            ),
        }
    }
}

impl std::error::Error for PlacementConfigError {}

/// Place a panel for `anchor`.
///
/// Range anchors use centred horizontal placement with left/right fallback;
/// point anchors are left-aligned. `panel` is the measured panel size; pass
/// `None` before the first paint.
pub fn place(
    anchor: &AnchorGeometry,
    panel: Option<Size>,
    viewport: &Viewport,
    config: &PlacementConfig,
) -> Option<PanelPlacement> {
    if anchor.is_degenerate() {
        return None;
    }
    let size = config.panel_size(panel);
    let bounds = anchor.bounds();
    let padding = config.padding;

    let (top, placement) =
        resolve_vertical(bounds, size.height, viewport, padding, config.vertical);
    let (left, horizontal_mode, clamped_width) = match anchor {
        AnchorGeometry::Range { .. } => resolve_centered(bounds, size.width, viewport, padding),
        AnchorGeometry::Point { .. } => {
            let (left, width) = resolve_left_aligned(bounds, size.width, viewport, padding);
            (left, HorizontalMode::Left, width)
        }
    };

    Some(PanelPlacement {
        top: top + viewport.scroll.y,
        left: left + viewport.scroll.x,
        placement,
        horizontal_mode,
        clamped_width,
    })
}

/// Panel width after clamping to the space between the paddings.
pub fn clamp_width(panel_width: f32, viewport: &Viewport, padding: f32) -> f32 {
    let available = (viewport.width() - 2.0 * padding).max(0.0);
    panel_width.min(available).max(0.0)
}

/// Vertical side and top edge, in viewport coordinates.
pub fn resolve_vertical(
    anchor: Rect,
    panel_height: f32,
    viewport: &Viewport,
    padding: f32,
    preference: VerticalPreference,
) -> (f32, VerticalPlacement) {
    let above = anchor.top() - panel_height - padding;
    let below = anchor.bottom() + padding;

    match preference {
        VerticalPreference::Above => {
            if above >= 0.0 {
                return (above, VerticalPlacement::Above);
            }
            let top = if below + panel_height > viewport.height() {
                viewport.height() - panel_height - padding
            } else {
                below
            };
            (top, VerticalPlacement::Below)
        }
        VerticalPreference::Below => {
            if below + panel_height <= viewport.height() {
                return (below, VerticalPlacement::Below);
            }
            let top = if above < 0.0 { padding } else { above };
            (top, VerticalPlacement::Above)
        }
    }
}

/// Centred placement with left/right fallback, in viewport coordinates.
///
/// Returns `(left, mode, clamped_width)`.
pub fn resolve_centered(
    anchor: Rect,
    panel_width: f32,
    viewport: &Viewport,
    padding: f32,
) -> (f32, HorizontalMode, f32) {
    let width = clamp_width(panel_width, viewport, padding);
    let min_left = padding;
    let max_left = viewport.width() - width - padding;

    let centered = anchor.center_x() - width / 2.0;
    if centered < min_left {
        return (anchor.left().min(max_left).max(min_left), HorizontalMode::Left, width);
    }
    if centered + width > viewport.width() - padding {
        let right_aligned = anchor.right() - width;
        return (
            right_aligned.min(max_left).max(min_left),
            HorizontalMode::Right,
            width,
        );
    }
    (centered, HorizontalMode::Center, width)
}

/// Left-aligned placement for a caret anchor, in viewport coordinates.
///
/// Returns `(left, clamped_width)`.
pub fn resolve_left_aligned(
    anchor: Rect,
    panel_width: f32,
    viewport: &Viewport,
    padding: f32,
) -> (f32, f32) {
    let width = clamp_width(panel_width, viewport, padding);
    let max_left = (viewport.width() - width - padding).max(padding);
    (anchor.left().clamp(padding, max_left), width)
}
