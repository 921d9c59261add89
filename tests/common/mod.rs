//! Common test utilities.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use gridslice::render::{CellRenderData, RenderBackend};
use gridslice::{CellConfig, Coordinate, GridEditor, Size, ViewMapper};

/// 2D editor over `columns x rows` with the identity view registered as 0.
pub fn editor_2d<T: PartialEq + 'static>(columns: u32, rows: u32) -> GridEditor<T> {
    GridEditor::new(Coordinate::xy(columns, rows), 0, ViewMapper::identity_2d())
        .expect("2d editor")
}

/// 3D editor with three faces registered:
/// - 0: x/y at z = 0
/// - 1: x/y at z = 1 (requires depth > 1)
/// - 2: z/y at x = 0
pub fn volume_editor<T: PartialEq + 'static>(extents: [u32; 3]) -> GridEditor<T> {
    let mut editor = GridEditor::new(
        Coordinate::from(extents),
        0,
        ViewMapper::slice(Coordinate::zeros(3), 0, 1).unwrap(),
    )
    .expect("3d editor");
    editor
        .register_view(1, ViewMapper::slice(Coordinate::from([0, 0, 1]), 0, 1).unwrap())
        .unwrap();
    editor
        .register_view(2, ViewMapper::slice(Coordinate::zeros(3), 2, 1).unwrap())
        .unwrap();
    editor
}

pub fn shared<T>(editor: GridEditor<T>) -> Rc<RefCell<GridEditor<T>>> {
    Rc::new(RefCell::new(editor))
}

pub fn cell_config(
    aspect_ratio: f32,
    min_cell_size: Option<Size>,
    scale: f32,
    column_count: u32,
    row_count: u32,
) -> CellConfig {
    CellConfig {
        aspect_ratio,
        min_cell_size,
        scale,
        column_count,
        row_count,
    }
}

/// Components of every coordinate, for compact comparisons.
pub fn components(coordinates: &[Coordinate]) -> Vec<Vec<u32>> {
    coordinates.iter().map(|c| c.components().to_vec()).collect()
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-4 * a.abs().max(b.abs()).max(1.0)
}

/// Backend that records what it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub frames: usize,
    pub size: Option<Size>,
    pub cells: Vec<CellRenderData>,
    pub finished: bool,
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self, size: Size) -> gridslice::Result<()> {
        self.frames += 1;
        self.size = Some(size);
        self.cells.clear();
        self.finished = false;
        Ok(())
    }

    fn draw_cell(&mut self, cell: &CellRenderData) -> gridslice::Result<()> {
        self.cells.push(cell.clone());
        Ok(())
    }

    fn end_frame(&mut self) -> gridslice::Result<()> {
        self.finished = true;
        Ok(())
    }
}
