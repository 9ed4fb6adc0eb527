//! Property-based invariant tests for geometry and scoped effects.
//!
//! 1. `from_edges` round-trips edges when they are ordered.
//! 2. Union contains both inputs.
//! 3. Document conversion is translation by the scroll offset.
//! 4. Any interleaving of listen/unlisten leaves the registry empty once
//!    every scope is released.

use quire_core::geometry::{Point, Rect, Viewport};
use quire_core::scope::{HostGlobals, ListenerSet};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn coord() -> impl Strategy<Value = f32> {
    (-2_000i32..=2_000).prop_map(|v| v as f32)
}

fn extent() -> impl Strategy<Value = f32> {
    (0i32..=1_000).prop_map(|v| v as f32)
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (coord(), coord(), extent(), extent()).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn listener_kinds() -> impl Strategy<Value = ListenerSet> {
    (1u16..(1 << 10)).prop_map(ListenerSet::from_bits_truncate)
}

proptest! {
    #[test]
    fn from_edges_round_trips(rect in rect_strategy()) {
        let rebuilt = Rect::from_edges(rect.left(), rect.top(), rect.right(), rect.bottom());
        prop_assert_eq!(rebuilt, rect);
    }

    #[test]
    fn union_contains_both(a in rect_strategy(), b in rect_strategy()) {
        let u = a.union(&b);
        prop_assert!(u.left() <= a.left() && u.left() <= b.left());
        prop_assert!(u.top() <= a.top() && u.top() <= b.top());
        prop_assert!(u.right() >= a.right() && u.right() >= b.right());
        prop_assert!(u.bottom() >= a.bottom() && u.bottom() >= b.bottom());
    }

    #[test]
    fn document_conversion_translates(
        rect in rect_strategy(),
        sx in extent(),
        sy in extent(),
    ) {
        let viewport = Viewport::new(1_000.0, 800.0).with_scroll(sx, sy);
        let doc = viewport.rect_to_document(rect);
        prop_assert_eq!(doc.size(), rect.size());
        prop_assert_eq!(doc.left() - rect.left(), sx);
        prop_assert_eq!(doc.top() - rect.top(), sy);

        let centre = Point::new(rect.center_x(), rect.top());
        prop_assert!(doc.contains(viewport.to_document(centre)));
    }

    #[test]
    fn releasing_every_scope_empties_registry(
        sets in proptest::collection::vec(listener_kinds(), 1..16),
        reverse in any::<bool>(),
    ) {
        let mut globals = HostGlobals::new();
        let mut scopes: Vec<_> = sets.iter().map(|kinds| globals.listen(*kinds)).collect();
        prop_assert_eq!(globals.listeners().scopes(), sets.len());
        if reverse {
            scopes.reverse();
        }
        for scope in scopes {
            prop_assert!(globals.unlisten(scope));
        }
        prop_assert!(globals.is_quiescent());
    }
}
