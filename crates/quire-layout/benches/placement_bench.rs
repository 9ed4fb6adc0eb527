//! Benchmarks for panel placement.
//!
//! Run with: cargo bench -p quire-layout

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use quire_layout::{AnchorGeometry, PlacementConfig, Rect, Size, Viewport, place};
use std::hint::black_box;

fn anchors() -> Vec<(&'static str, AnchorGeometry)> {
    vec![
        (
            "centre",
            AnchorGeometry::range(
                Rect::from_edges(400.0, 300.0, 400.0, 318.0),
                Rect::from_edges(500.0, 300.0, 500.0, 318.0),
            ),
        ),
        (
            "flip_left",
            AnchorGeometry::range(
                Rect::from_edges(2.0, 4.0, 2.0, 20.0),
                Rect::from_edges(30.0, 4.0, 30.0, 20.0),
            ),
        ),
        (
            "multi_line_right",
            AnchorGeometry::range(
                Rect::from_edges(960.0, 100.0, 960.0, 118.0),
                Rect::from_edges(990.0, 700.0, 990.0, 718.0),
            ),
        ),
        ("caret", AnchorGeometry::point(Rect::new(120.0, 770.0, 0.0, 18.0))),
    ]
}

fn bench_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement/place");
    let viewport = Viewport::new(1_000.0, 800.0).with_scroll(0.0, 2_400.0);
    let panel = Some(Size::new(200.0, 40.0));

    for (name, anchor) in anchors() {
        let config = match anchor {
            AnchorGeometry::Range { .. } => PlacementConfig::toolbar(),
            AnchorGeometry::Point { .. } => PlacementConfig::caret_menu(),
        };
        group.bench_with_input(BenchmarkId::new("anchor", name), &anchor, |b, anchor| {
            b.iter(|| black_box(place(black_box(anchor), panel, &viewport, &config)))
        });
    }

    group.finish();
}

fn bench_recompute_on_scroll(c: &mut Criterion) {
    let anchor = AnchorGeometry::range(
        Rect::from_edges(400.0, 300.0, 400.0, 318.0),
        Rect::from_edges(500.0, 300.0, 500.0, 318.0),
    );
    let config = PlacementConfig::toolbar();

    c.bench_function("placement/scroll_sweep_1k", |b| {
        b.iter(|| {
            for step in 0..1_000u16 {
                let viewport = Viewport::new(1_000.0, 800.0).with_scroll(0.0, f32::from(step));
                black_box(place(&anchor, None, &viewport, &config));
            }
        })
    });
}

criterion_group!(benches, bench_place, bench_recompute_on_scroll);
criterion_main!(benches);
