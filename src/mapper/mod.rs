//! View mappers: which two axes of the N-dimensional space form a view, and
//! in which order and direction that 2D slice is walked.
//!
//! A [`ViewMapper`] is plain configuration. The traversal itself is the same
//! for every mapper and lives in [`Traversal`].

mod traversal;

pub use traversal::{AxisRange, Traversal};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use crate::error::{GridError, Result};
use crate::types::{Coordinate, Size};

/// Outer/inner loop choice when walking a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IterationOrder {
    /// Rows are the outer loop, columns the inner one: the column index
    /// varies fastest.
    #[default]
    RowMajor,
    /// Columns are the outer loop, rows the inner one: the row index varies
    /// fastest.
    ColumnMajor,
}

/// Integrator-supplied conversion from `(horizontal, vertical)` to a coordinate.
pub type ConvertFn = Rc<dyn Fn(u32, u32) -> Coordinate>;

/// How a `(horizontal, vertical)` pair becomes a full coordinate.
#[derive(Clone)]
pub enum Projection {
    /// Inject `h`/`v` into the two view axes of a template; every other axis
    /// keeps the template's value.
    Slice(Coordinate),
    /// Arbitrary conversion.
    Custom(ConvertFn),
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slice(template) => f.debug_tuple("Slice").field(template).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Policy translating a 2D view position into an N-dimensional coordinate.
#[derive(Debug, Clone)]
pub struct ViewMapper {
    horizontal_axis: usize,
    vertical_axis: usize,
    projection: Projection,
    reverse_horizontal: bool,
    reverse_vertical: bool,
    order: IterationOrder,
    aspect_ratio: f32,
    min_cell_size: Option<Size>,
}

impl ViewMapper {
    /// Canonical 2D mapper: axis 0 horizontal, axis 1 vertical, no reversal.
    pub fn identity_2d() -> Self {
        Self::from_parts(0, 1, Projection::Slice(Coordinate::zeros(2)))
    }

    /// View the `(horizontal, vertical)` face of a space, holding every other
    /// axis at the value given by `template`.
    ///
    /// # Errors
    /// `InvalidAxes` if both axes are equal, `AxisOutOfRange` if either axis
    /// does not exist in `template`.
    pub fn slice(template: Coordinate, horizontal_axis: usize, vertical_axis: usize) -> Result<Self> {
        check_distinct(horizontal_axis, vertical_axis)?;
        for axis in [horizontal_axis, vertical_axis] {
            if axis >= template.dimensions() {
                return Err(GridError::AxisOutOfRange {
                    axis,
                    dimensions: template.dimensions(),
                });
            }
        }
        Ok(Self::from_parts(
            horizontal_axis,
            vertical_axis,
            Projection::Slice(template),
        ))
    }

    /// Mapper with an integrator-supplied conversion.
    ///
    /// # Errors
    /// `InvalidAxes` if both axes are equal.
    pub fn custom(
        horizontal_axis: usize,
        vertical_axis: usize,
        convert: impl Fn(u32, u32) -> Coordinate + 'static,
    ) -> Result<Self> {
        check_distinct(horizontal_axis, vertical_axis)?;
        Ok(Self::from_parts(
            horizontal_axis,
            vertical_axis,
            Projection::Custom(Rc::new(convert)),
        ))
    }

    fn from_parts(horizontal_axis: usize, vertical_axis: usize, projection: Projection) -> Self {
        Self {
            horizontal_axis,
            vertical_axis,
            projection,
            reverse_horizontal: false,
            reverse_vertical: false,
            order: IterationOrder::default(),
            aspect_ratio: 1.0,
            min_cell_size: None,
        }
    }

    #[must_use]
    pub fn reversed_horizontal(mut self, reversed: bool) -> Self {
        self.reverse_horizontal = reversed;
        self
    }

    #[must_use]
    pub fn reversed_vertical(mut self, reversed: bool) -> Self {
        self.reverse_vertical = reversed;
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: IterationOrder) -> Self {
        self.order = order;
        self
    }

    /// Width/height ratio of one cell.
    ///
    /// Negative values are taken as absolute; zero or non-finite values keep 1.0.
    #[must_use]
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        let a = aspect_ratio.abs();
        if a.is_finite() && a > 0.0 {
            self.aspect_ratio = a;
        } else {
            tracing::warn!(aspect_ratio, "ignoring invalid aspect ratio, keeping 1.0");
            self.aspect_ratio = 1.0;
        }
        self
    }

    #[must_use]
    pub fn with_min_cell_size(mut self, min: Size) -> Self {
        self.min_cell_size = Some(Size::new(min.width.max(0.0), min.height.max(0.0)));
        self
    }

    pub fn horizontal_axis(&self) -> usize {
        self.horizontal_axis
    }

    pub fn vertical_axis(&self) -> usize {
        self.vertical_axis
    }

    /// Highest axis index the mapper addresses.
    pub fn max_axis(&self) -> usize {
        self.horizontal_axis.max(self.vertical_axis)
    }

    pub fn reverse_horizontal(&self) -> bool {
        self.reverse_horizontal
    }

    pub fn reverse_vertical(&self) -> bool {
        self.reverse_vertical
    }

    pub fn order(&self) -> IterationOrder {
        self.order
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn min_cell_size(&self) -> Option<Size> {
        self.min_cell_size
    }

    /// Coordinate addressed by view position `(h, v)`.
    pub fn convert(&self, h: u32, v: u32) -> Coordinate {
        match &self.projection {
            // Both axes exist in the template, checked by `slice`
            Projection::Slice(template) => template
                .with_axis(self.horizontal_axis, h)
                .and_then(|c| c.with_axis(self.vertical_axis, v))
                .unwrap_or_else(|| template.clone()),
            Projection::Custom(convert) => convert(h, v),
        }
    }

    /// Column of `coordinate` in this view.
    pub fn column_of(&self, coordinate: &Coordinate) -> Option<u32> {
        coordinate.get(self.horizontal_axis)
    }

    /// Row of `coordinate` in this view.
    pub fn row_of(&self, coordinate: &Coordinate) -> Option<u32> {
        coordinate.get(self.vertical_axis)
    }

    /// Walk a `columns x rows` view in render order, yielding `(column, row)`.
    pub fn traverse(&self, columns: u32, rows: u32) -> Traversal {
        Traversal::new(
            AxisRange::new(columns, self.reverse_horizontal),
            AxisRange::new(rows, self.reverse_vertical),
            self.order,
        )
    }

    /// `(column, row)` visited at render-order index `step`.
    pub fn step_position(&self, step: usize, columns: u32, rows: u32) -> Option<(u32, u32)> {
        let cols = usize::try_from(columns).ok()?;
        let rws = usize::try_from(rows).ok()?;
        if step >= cols.checked_mul(rws)? {
            return None;
        }
        let (outer, inner, outer_range, inner_range) = match self.order {
            IterationOrder::RowMajor => (
                step / cols,
                step % cols,
                AxisRange::new(rows, self.reverse_vertical),
                AxisRange::new(columns, self.reverse_horizontal),
            ),
            IterationOrder::ColumnMajor => (
                step / rws,
                step % rws,
                AxisRange::new(columns, self.reverse_horizontal),
                AxisRange::new(rows, self.reverse_vertical),
            ),
        };
        let outer = outer_range.nth_value(u32::try_from(outer).ok()?)?;
        let inner = inner_range.nth_value(u32::try_from(inner).ok()?)?;
        Some(match self.order {
            IterationOrder::RowMajor => (inner, outer),
            IterationOrder::ColumnMajor => (outer, inner),
        })
    }
}

impl Default for ViewMapper {
    fn default() -> Self {
        Self::identity_2d()
    }
}

fn check_distinct(horizontal: usize, vertical: usize) -> Result<()> {
    if horizontal == vertical {
        return Err(GridError::InvalidAxes {
            horizontal,
            vertical,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_convert() {
        let m = ViewMapper::identity_2d();
        assert_eq!(m.convert(3, 4), Coordinate::xy(3, 4));
        assert_eq!(m.column_of(&Coordinate::xy(3, 4)), Some(3));
        assert_eq!(m.row_of(&Coordinate::xy(3, 4)), Some(4));
        assert_eq!(m.aspect_ratio(), 1.0);
        assert_eq!(m.min_cell_size(), None);
    }

    #[test]
    fn test_slice_holds_other_axes() {
        // XZ face of a volume at y = 7
        let m = ViewMapper::slice(Coordinate::from([0, 7, 0]), 0, 2).unwrap();
        assert_eq!(m.convert(1, 2), Coordinate::from([1, 7, 2]));
    }

    #[test]
    fn test_slice_rejects_bad_axes() {
        assert!(matches!(
            ViewMapper::slice(Coordinate::zeros(3), 1, 1),
            Err(GridError::InvalidAxes { .. })
        ));
        assert!(matches!(
            ViewMapper::slice(Coordinate::zeros(2), 0, 2),
            Err(GridError::AxisOutOfRange { axis: 2, .. })
        ));
    }

    #[test]
    fn test_aspect_ratio_sanitized() {
        assert_eq!(ViewMapper::identity_2d().with_aspect_ratio(-2.0).aspect_ratio(), 2.0);
        assert_eq!(ViewMapper::identity_2d().with_aspect_ratio(0.0).aspect_ratio(), 1.0);
        assert_eq!(
            ViewMapper::identity_2d().with_aspect_ratio(f32::NAN).aspect_ratio(),
            1.0
        );
    }

    #[test]
    fn test_step_position_matches_traversal() {
        let m = ViewMapper::identity_2d()
            .reversed_horizontal(true)
            .with_order(IterationOrder::ColumnMajor);
        let walked: Vec<(u32, u32)> = m.traverse(3, 2).collect();
        for (step, pos) in walked.iter().enumerate() {
            assert_eq!(m.step_position(step, 3, 2), Some(*pos));
        }
        assert_eq!(m.step_position(6, 3, 2), None);
    }
}
