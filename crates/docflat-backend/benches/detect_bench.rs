// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the native backend: contour detection on a
// synthetic page and the perspective warp.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};

use docflat_backend::{DocumentBackend, NativeBackend};
use docflat_core::Quadrilateral;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// 320x240 dark frame with a bright page from (40, 30) to (280, 210).
fn synthetic_page() -> DynamicImage {
    let mut img = GrayImage::from_pixel(320, 240, Luma([30u8]));
    for y in 30..210 {
        for x in 40..280 {
            img.put_pixel(x, y, Luma([240u8]));
        }
    }
    DynamicImage::ImageLuma8(img)
}

fn bench_native_detect(c: &mut Criterion) {
    let page = synthetic_page();
    let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(320, 240, Luma([128u8])));
    let backend = NativeBackend::default();

    c.bench_function("native detect (320x240 page)", |b| {
        b.iter(|| black_box(backend.detect(black_box(&page)).is_success()));
    });

    // Worst case: the whole sweep runs twice and finds nothing.
    c.bench_function("native detect (320x240 blank)", |b| {
        b.iter(|| black_box(backend.detect(black_box(&blank)).is_not_found()));
    });
}

fn bench_native_correct(c: &mut Criterion) {
    let page = synthetic_page();
    let backend = NativeBackend::default();
    let quad = Quadrilateral::unit_square();

    c.bench_function("native correct (320x240 full frame)", |b| {
        b.iter(|| black_box(backend.correct(black_box(&page), &quad).is_success()));
    });
}

criterion_group!(benches, bench_native_detect, bench_native_correct);
criterion_main!(benches);
