//! Benchmarks for view materialization and layout.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridslice::{CellConfig, Coordinate, GridEditor, GridLayout, Size, ViewMapper};

/// Activation of a square 2D view, first time (creates every record) and
/// repeated (reuses them).
fn bench_activate(c: &mut Criterion) {
    let mut group = c.benchmark_group("activate_view");
    for side in [32u32, 128, 512] {
        group.throughput(Throughput::Elements(u64::from(side * side)));

        group.bench_with_input(BenchmarkId::new("fresh", side), &side, |b, &side| {
            b.iter(|| {
                let mut editor: GridEditor<u32> =
                    GridEditor::new(Coordinate::xy(side, side), 0, ViewMapper::identity_2d())
                        .expect("editor");
                editor.activate_view(black_box(0)).expect("activate");
                editor
            })
        });

        let mut editor: GridEditor<u32> =
            GridEditor::new(Coordinate::xy(side, side), 0, ViewMapper::identity_2d())
                .expect("editor");
        editor.activate_view(0).expect("activate");
        group.bench_with_input(BenchmarkId::new("reuse", side), &side, |b, _| {
            b.iter(|| editor.activate_view(black_box(0)).expect("activate"))
        });
    }
    group.finish();
}

/// Layout pass over a 3D slice, alternating container widths so every pass
/// takes the carry-forward path.
fn bench_arrange(c: &mut Criterion) {
    let mut group = c.benchmark_group("arrange");
    for side in [32u32, 128, 512] {
        let mapper = ViewMapper::slice(Coordinate::from([0, 0, 2]), 0, 1)
            .expect("mapper")
            .with_aspect_ratio(1.5)
            .with_min_cell_size(Size::new(4.0, 4.0));
        let coordinates: Vec<Coordinate> = mapper
            .traverse(side, side)
            .map(|(h, v)| mapper.convert(h, v))
            .collect();
        let config = CellConfig {
            aspect_ratio: 1.5,
            min_cell_size: Some(Size::new(4.0, 4.0)),
            scale: 1.0,
            column_count: side,
            row_count: side,
        };

        group.throughput(Throughput::Elements(u64::from(side * side)));
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            let mut layout = GridLayout::default();
            let mut wide = false;
            b.iter(|| {
                wide = !wide;
                let width = if wide { 1600.0 } else { 1200.0 };
                layout
                    .arrange(
                        black_box(&coordinates),
                        &mapper,
                        &config,
                        Size::new(width, 900.0),
                    )
                    .expect("arrange")
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_activate, bench_arrange);
criterion_main!(benches);
