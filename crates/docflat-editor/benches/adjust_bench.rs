// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the corner adjustment hot path. Every pointer move
// during a drag runs `adjust`, so it has to stay well under a frame budget.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use docflat_core::{CornerLabel, Point2D, Quadrilateral};
use docflat_editor::{CornerGesture, adjust};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// One adjustment that relabels and one that does not.
fn bench_adjust(c: &mut Criterion) {
    let quad = Quadrilateral::new(
        Point2D::new(100.0, 100.0),
        Point2D::new(900.0, 100.0),
        Point2D::new(100.0, 700.0),
        Point2D::new(900.0, 700.0),
    );
    let frame = (1000.0, 800.0);

    c.bench_function("adjust (no swap)", |b| {
        b.iter(|| adjust(black_box(quad), CornerLabel::TopLeft, black_box(Point2D::new(140.0, 120.0)), frame));
    });

    c.bench_function("adjust (side-edge swap)", |b| {
        b.iter(|| adjust(black_box(quad), CornerLabel::TopLeft, black_box(Point2D::new(950.0, 200.0)), frame));
    });
}

/// A full press / 100 moves / release sweep across the image.
fn bench_drag_sweep(c: &mut Criterion) {
    let start = Quadrilateral::full_frame(1000.0, 800.0);

    c.bench_function("drag sweep (100 moves)", |b| {
        b.iter(|| {
            let mut gesture = CornerGesture::new(1000.0, 800.0, 24.0);
            let mut quad = gesture.press(start, Point2D::new(0.0, 0.0)).quad;
            for step in 0..100 {
                let t = f64::from(step) * 10.0;
                quad = gesture.drag_to(quad, Point2D::new(t, t * 0.8)).quad;
            }
            black_box(gesture.release(quad).quad)
        });
    });
}

criterion_group!(benches, bench_adjust, bench_drag_sweep);
criterion_main!(benches);
