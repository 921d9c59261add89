//! Result of a layout pass.

use serde::Serialize;
use std::collections::HashMap;

use crate::types::{CellRect, Coordinate, Size};

/// One visible cell with its grid position and pixel bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedCell {
    pub coordinate: Coordinate,
    pub column: u32,
    pub row: u32,
    pub rect: CellRect,
}

/// Pixel layout of a whole view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridGeometry {
    /// Uniform cell size (scale applied)
    pub cell_size: Size,
    pub columns: u32,
    pub rows: u32,
    /// Cells in render order
    pub cells: Vec<PlacedCell>,
    #[serde(skip)]
    by_position: HashMap<(u32, u32), usize>,
}

impl GridGeometry {
    pub(crate) fn new(cell_size: Size, columns: u32, rows: u32, cells: Vec<PlacedCell>) -> Self {
        let by_position = cells
            .iter()
            .enumerate()
            .map(|(i, c)| ((c.column, c.row), i))
            .collect();
        Self {
            cell_size,
            columns,
            rows,
            cells,
            by_position,
        }
    }

    /// Total size covered by the grid.
    pub fn content_size(&self) -> Size {
        Size::new(
            self.cell_size.width * self.columns as f32,
            self.cell_size.height * self.rows as f32,
        )
    }

    /// Bounds of the cell at `(column, row)`.
    pub fn rect_at(&self, column: u32, row: u32) -> Option<CellRect> {
        self.placed_at(column, row).map(|c| c.rect)
    }

    pub fn placed_at(&self, column: u32, row: u32) -> Option<&PlacedCell> {
        self.by_position
            .get(&(column, row))
            .and_then(|&i| self.cells.get(i))
    }

    /// Bounds of the cell showing `coordinate`.
    pub fn rect_of(&self, coordinate: &Coordinate) -> Option<CellRect> {
        self.cells
            .iter()
            .find(|c| &c.coordinate == coordinate)
            .map(|c| c.rect)
    }

    /// `(column, row)` under the point `(x, y)`, if inside the grid.
    pub fn cell_at_point(&self, x: f32, y: f32) -> Option<(u32, u32)> {
        if self.cell_size.is_empty() || x < 0.0 || y < 0.0 {
            return None;
        }
        let column = to_index(x / self.cell_size.width)?;
        let row = to_index(y / self.cell_size.height)?;
        (column < self.columns && row < self.rows).then_some((column, row))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_index(value: f32) -> Option<u32> {
    // Caller guarantees value >= 0
    let floored = value.floor();
    (floored.is_finite() && floored <= u32::MAX as f32).then_some(floored as u32)
}
