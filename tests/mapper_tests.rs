//! View mapper traversal: order, reversal, conversion and step recovery.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use gridslice::{Coordinate, GridError, IterationOrder, ViewMapper};
use test_case::test_case;

fn walk(mapper: &ViewMapper, columns: u32, rows: u32) -> Vec<(u32, u32)> {
    mapper.traverse(columns, rows).collect()
}

#[test_case(IterationOrder::RowMajor, false, false, &[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)] ; "row major")]
#[test_case(IterationOrder::RowMajor, true, false, &[(2, 0), (1, 0), (0, 0), (2, 1), (1, 1), (0, 1)] ; "row major reversed horizontal")]
#[test_case(IterationOrder::RowMajor, false, true, &[(0, 1), (1, 1), (2, 1), (0, 0), (1, 0), (2, 0)] ; "row major reversed vertical")]
#[test_case(IterationOrder::ColumnMajor, false, false, &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)] ; "column major")]
#[test_case(IterationOrder::ColumnMajor, true, true, &[(2, 1), (2, 0), (1, 1), (1, 0), (0, 1), (0, 0)] ; "column major both reversed")]
fn test_traversal_3x2(
    order: IterationOrder,
    reverse_horizontal: bool,
    reverse_vertical: bool,
    expected: &[(u32, u32)],
) {
    let mapper = ViewMapper::identity_2d()
        .with_order(order)
        .reversed_horizontal(reverse_horizontal)
        .reversed_vertical(reverse_vertical);
    assert_eq!(walk(&mapper, 3, 2), expected);
}

#[test_case(0, 0 ; "empty")]
#[test_case(3, 0 ; "no rows")]
#[test_case(0, 4 ; "no columns")]
fn test_empty_extents_walk_nothing(columns: u32, rows: u32) {
    let mapper = ViewMapper::identity_2d();
    assert!(walk(&mapper, columns, rows).is_empty());
    assert_eq!(mapper.traverse(columns, rows).total(), 0);
}

#[test]
fn test_step_position_matches_traversal() {
    for order in [IterationOrder::RowMajor, IterationOrder::ColumnMajor] {
        for (rh, rv) in [(false, false), (true, false), (false, true), (true, true)] {
            let mapper = ViewMapper::identity_2d()
                .with_order(order)
                .reversed_horizontal(rh)
                .reversed_vertical(rv);
            for (step, position) in mapper.traverse(4, 3).enumerate() {
                assert_eq!(mapper.step_position(step, 4, 3), Some(position));
            }
            assert_eq!(mapper.step_position(12, 4, 3), None);
        }
    }
}

#[test]
fn test_slice_holds_other_axes() {
    let mapper = ViewMapper::slice(Coordinate::from([9, 8, 7, 6]), 3, 1).unwrap();
    let c = mapper.convert(2, 5);
    assert_eq!(c, Coordinate::from([9, 5, 7, 2]));
    assert_eq!(mapper.column_of(&c), Some(2));
    assert_eq!(mapper.row_of(&c), Some(5));
    assert_eq!(mapper.max_axis(), 3);
}

#[test]
fn test_slice_rejects_bad_axes() {
    assert!(matches!(
        ViewMapper::slice(Coordinate::zeros(3), 1, 1),
        Err(GridError::InvalidAxes {
            horizontal: 1,
            vertical: 1
        })
    ));
    assert!(matches!(
        ViewMapper::slice(Coordinate::zeros(2), 0, 2),
        Err(GridError::AxisOutOfRange {
            axis: 2,
            dimensions: 2
        })
    ));
}

#[test_case(2.0, 2.0 ; "positive kept")]
#[test_case(-0.5, 0.5 ; "negative made positive")]
#[test_case(0.0, 1.0 ; "zero falls back")]
#[test_case(f32::NAN, 1.0 ; "nan falls back")]
fn test_aspect_ratio_sanitized(input: f32, expected: f32) {
    let mapper = ViewMapper::identity_2d().with_aspect_ratio(input);
    assert_eq!(mapper.aspect_ratio().to_bits(), expected.to_bits());
}

#[test]
fn test_custom_projection_is_used() {
    let mapper = ViewMapper::custom(0, 2, |h, v| Coordinate::from([h, 1, v])).unwrap();
    assert_eq!(mapper.convert(3, 4), Coordinate::from([3, 1, 4]));
    assert_eq!(mapper.row_of(&Coordinate::from([3, 1, 4])), Some(4));
}
