//! Render backend trait for pluggable rendering implementations.
//!
//! `GridView::render` feeds one frame at a time: `begin_frame`, one
//! `draw_cell` per visible cell in render order, then `end_frame`.

use crate::error::Result;
use crate::types::{CellRect, Coordinate, Size};

/// A CSS color string (e.g., "#FF0000", "rgba(255, 0, 0, 0.5)")
pub type CssColor = String;

/// Data needed to render a single cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellRenderData {
    pub coordinate: Coordinate,
    pub column: u32,
    pub row: u32,
    pub rect: CellRect,
    /// Text produced by the cell renderer.
    pub label: Option<String>,
    /// Background produced by the cell renderer.
    pub fill: Option<CssColor>,
    pub has_data: bool,
}

/// Colors used when the cell renderer leaves a field unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: CssColor,
    pub empty_fill: CssColor,
    pub data_fill: CssColor,
    pub grid_line: CssColor,
    pub text: CssColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            empty_fill: "#FFFFFF".to_string(),
            data_fill: "#F3F6FA".to_string(),
            grid_line: "#D0D7DE".to_string(),
            text: "#1F2328".to_string(),
        }
    }
}

impl Palette {
    /// Fill for `cell`: its own, else the palette's data/empty color.
    pub fn fill_for<'a>(&'a self, cell: &'a CellRenderData) -> &'a str {
        match &cell.fill {
            Some(fill) => fill,
            None if cell.has_data => &self.data_fill,
            None => &self.empty_fill,
        }
    }
}

/// Trait for render backends
///
/// Implementations handle the actual drawing operations for different
/// rendering technologies (SVG text, Canvas 2D).
pub trait RenderBackend {
    /// Start a frame of `size` logical pixels.
    fn begin_frame(&mut self, size: Size) -> Result<()>;

    fn draw_cell(&mut self, cell: &CellRenderData) -> Result<()>;

    /// Finish the frame.
    fn end_frame(&mut self) -> Result<()> {
        Ok(())
    }
}
