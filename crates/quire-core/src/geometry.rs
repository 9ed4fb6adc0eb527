#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixels.
//!
//! Two coordinate spaces appear throughout Quire:
//!
//! - **viewport** (client) coordinates, origin at the top-left of the visible
//!   window, as reported by the host for selections and pointer events;
//! - **document** coordinates, viewport coordinates plus the current scroll
//!   offset, used for panel placement so a placed panel stays put while the
//!   page scrolls.
//!
//! [`Viewport`] converts between the two.

/// A point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise offset.
    #[inline]
    #[must_use]
    pub fn offset(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    /// Component-wise difference `self - origin`.
    #[inline]
    #[must_use]
    pub fn delta_from(self, origin: Point) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }

    /// True when both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are finite and strictly positive.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// An axis-aligned rectangle.
///
/// `right` and `bottom` are `x + width` and `y + height`. Hit testing treats
/// all four edges as inside, matching how rendered element bounds behave.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from its edges, the shape hosts usually report
    /// (`{top, left, right, bottom}`).
    ///
    /// Inverted edges produce a zero-sized extent rather than a negative one.
    #[inline]
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
    }

    /// Create a rectangle at `origin` with the given size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    pub const fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub const fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal centre.
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when the rectangle covers no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// True when the rectangle has no extent in either direction.
    ///
    /// A caret rectangle (zero width, line height tall) is *not* degenerate.
    #[inline]
    pub fn is_point(&self) -> bool {
        self.width <= 0.0 && self.height <= 0.0
    }

    /// True when every coordinate is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Check whether a point lies inside the rectangle, edges included.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::from_edges(left, top, right, bottom)
    }

    /// Translate by `by`.
    #[inline]
    #[must_use]
    pub fn offset(&self, by: Point) -> Rect {
        Rect::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }
}

/// The visible window: its inner size plus the current scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub size: Size,
    pub scroll: Point,
}

impl Viewport {
    /// An unscrolled viewport.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            scroll: Point::ZERO,
        }
    }

    /// Set the scroll offset.
    #[inline]
    #[must_use]
    pub const fn with_scroll(mut self, x: f32, y: f32) -> Self {
        self.scroll = Point::new(x, y);
        self
    }

    #[inline]
    pub const fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub const fn height(&self) -> f32 {
        self.size.height
    }

    /// Convert a viewport point into document coordinates.
    #[inline]
    pub fn to_document(&self, point: Point) -> Point {
        point.offset(self.scroll)
    }

    /// Convert a viewport rectangle into document coordinates.
    #[inline]
    pub fn rect_to_document(&self, rect: Rect) -> Rect {
        rect.offset(self.scroll)
    }

    /// The visible region in document coordinates.
    #[inline]
    pub fn document_bounds(&self) -> Rect {
        Rect::from_origin_size(self.scroll, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Size, Viewport};

    #[test]
    fn rect_contains_includes_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(40.0, 60.0)));
        assert!(!rect.contains(Point::new(40.5, 60.0)));
        assert!(!rect.contains(Point::new(9.9, 30.0)));
    }

    #[test]
    fn from_edges_matches_host_shape() {
        let rect = Rect::from_edges(100.0, 5.0, 150.0, 20.0);
        assert_eq!(rect, Rect::new(100.0, 5.0, 50.0, 15.0));
        assert_eq!(rect.right(), 150.0);
        assert_eq!(rect.bottom(), 20.0);
        assert_eq!(rect.center_x(), 125.0);
    }

    #[test]
    fn from_edges_inverted_is_zero_sized() {
        let rect = Rect::from_edges(50.0, 50.0, 40.0, 10.0);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
        assert!(rect.is_point());
    }

    #[test]
    fn caret_rect_is_empty_but_not_a_point() {
        let caret = Rect::new(12.0, 40.0, 0.0, 18.0);
        assert!(caret.is_empty());
        assert!(!caret.is_point());
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 5.0, 20.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 25.0, 25.0));
    }

    #[test]
    fn non_finite_rect_detected() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_finite());
        assert!(!Rect::new(f32::NAN, 0.0, 1.0, 1.0).is_finite());
        assert!(!Rect::new(0.0, 0.0, f32::INFINITY, 1.0).is_finite());
    }

    #[test]
    fn size_usable_requires_positive_finite() {
        assert!(Size::new(200.0, 40.0).is_usable());
        assert!(!Size::new(0.0, 40.0).is_usable());
        assert!(!Size::new(200.0, f32::NAN).is_usable());
    }

    #[test]
    fn viewport_document_conversion_adds_scroll() {
        let viewport = Viewport::new(1000.0, 800.0).with_scroll(0.0, 300.0);
        assert_eq!(
            viewport.to_document(Point::new(10.0, 10.0)),
            Point::new(10.0, 310.0)
        );
        assert_eq!(
            viewport.document_bounds(),
            Rect::new(0.0, 300.0, 1000.0, 800.0)
        );
    }

    #[test]
    fn point_delta_is_relative_to_origin() {
        let start = Point::new(100.0, 50.0);
        assert_eq!(Point::new(160.0, 45.0).delta_from(start), (60.0, -5.0));
    }
}
