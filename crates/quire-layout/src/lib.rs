#![forbid(unsafe_code)]

//! Placement math for floating editor panels.
//!
//! - [`place`] - resolve a [`PanelPlacement`] for an [`AnchorGeometry`]
//! - [`PlacementConfig`] - padding, fallback size, and vertical preference
//!
//! Range anchors (text selections) are centred with left/right fallback;
//! point anchors (carets) are left-aligned. Both flip vertically when the
//! preferred side overflows the viewport.
//!
//! ```
//! use quire_layout::{place, AnchorGeometry, PlacementConfig, Rect, Size, Viewport};
//!
//! let anchor = AnchorGeometry::range(
//!     Rect::from_edges(100.0, 5.0, 100.0, 20.0),
//!     Rect::from_edges(150.0, 5.0, 150.0, 20.0),
//! );
//! let placed = place(
//!     &anchor,
//!     Some(Size::new(200.0, 40.0)),
//!     &Viewport::new(1000.0, 800.0),
//!     &PlacementConfig::toolbar(),
//! )
//! .unwrap();
//! assert_eq!(placed.top, 28.0);
//! assert_eq!(placed.left, 25.0);
//! ```

pub mod placement;

pub use placement::{
    AnchorGeometry, DEFAULT_PADDING, FALLBACK_PANEL_SIZE, HorizontalMode, PanelPlacement,
    PlacementConfig, PlacementConfigError, VerticalPlacement, VerticalPreference, place,
};
pub use quire_core::geometry::{Point, Rect, Size, Viewport};
