//! Structured error types for gridslice.

use crate::editor::ViewId;

/// All errors that can occur while editing, laying out or rendering a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A store needs at least two dimensions to produce a 2D slice.
    #[error("Grid needs at least 2 dimensions, got {actual}")]
    Dimensionality { actual: usize },

    /// A coordinate's arity disagrees with the store's dimensionality.
    #[error("Coordinate {coordinate} has {actual} components, store has {expected} dimensions")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        coordinate: String,
    },

    /// A view reached the same coordinate from two grid positions.
    #[error("Coordinate {coordinate} reached twice (again at column {column}, row {row})")]
    DuplicateCoordinate {
        coordinate: String,
        column: u32,
        row: u32,
    },

    /// Horizontal and vertical axis of a view must differ.
    #[error("Horizontal and vertical axis must differ (both {horizontal}/{vertical})")]
    InvalidAxes { horizontal: usize, vertical: usize },

    /// An axis index does not exist in the coordinate space.
    #[error("Axis {axis} out of range for {dimensions} dimensions")]
    AxisOutOfRange { axis: usize, dimensions: usize },

    /// Activation of a view id that was never registered.
    #[error("Unknown view: {0}")]
    UnknownView(ViewId),

    /// Materialized record count differs from `columns x rows`.
    #[error("Layout inconsistent: expected {expected} cells, got {actual}")]
    LayoutInconsistent { expected: usize, actual: usize },

    /// Failure reported by a search predicate.
    #[error("Search failed: {0}")]
    Search(String),

    /// Invalid grid configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
