//! # Slot Buffer Benchmark
//!
//! Measures the per-frame cost of the overlay's vertex storage:
//! 1. Re-showing every keyed line (the common "move it each frame" case)
//! 2. Delete/show churn through the free list
//! 3. Filling a single-frame buffer
//!
//! Target: re-showing 10k lines stays well under a millisecond.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gearbox::core::Vec3;
use gearbox::ui::Color;
use gearbox::{OnceBuffer, OverlayVertex, SlotBuffer};

fn segment(i: usize) -> [OverlayVertex; 2] {
    let x = i as f32;
    [
        OverlayVertex::new(Vec3::new(x, 0.0, 0.0), Color::RED),
        OverlayVertex::new(Vec3::new(x, 1.0, 0.0), Color::RED),
    ]
}

fn bench_reshow(c: &mut Criterion) {
    let mut group = c.benchmark_group("slot_buffer_reshow");

    for count in [1_000, 10_000] {
        let keys: Vec<String> = (0..count).map(|i| format!("line{i}")).collect();
        let mut buffer = SlotBuffer::<2>::new(count);
        for (i, key) in keys.iter().enumerate() {
            buffer.show(key, segment(i));
        }

        group.bench_with_input(BenchmarkId::new("show_existing", count), &count, |b, _| {
            b.iter(|| {
                for (i, key) in keys.iter().enumerate() {
                    black_box(buffer.show(key, segment(i)));
                }
            });
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let count = 10_000;
    let keys: Vec<String> = (0..count).map(|i| format!("line{i}")).collect();
    let mut buffer = SlotBuffer::<2>::new(count);
    for (i, key) in keys.iter().enumerate() {
        buffer.show(key, segment(i));
    }

    c.bench_function("slot_buffer_delete_show_churn", |b| {
        b.iter(|| {
            for (i, key) in keys.iter().enumerate().step_by(10) {
                buffer.delete(key);
                black_box(buffer.show(key, segment(i)));
            }
        });
    });
}

fn bench_once(c: &mut Criterion) {
    let count = 10_000;
    let mut buffer = OnceBuffer::<2>::new(count);

    c.bench_function("once_buffer_fill", |b| {
        b.iter(|| {
            buffer.begin_frame();
            for i in 0..count {
                black_box(buffer.push(segment(i)));
            }
        });
    });
}

criterion_group!(benches, bench_reshow, bench_churn, bench_once);
criterion_main!(benches);
