//! gridslice - multidimensional grid editing
//!
//! Stores sparse per-coordinate data in an N-dimensional space (N >= 2) and
//! presents any 2D slice of it as a uniform, aspect-preserving grid:
//! - View mappers pick two axes plus traversal order and direction
//! - Cell records are created lazily on first observation and never duplicated
//! - One cell size is derived from the container, aspect ratio, minimum size
//!   and a shared scale, and carried forward across resizes
//! - Rendering to SVG natively and to Canvas 2D via WebAssembly
//!
//! # Usage (Rust)
//!
//! ```
//! use gridslice::{Coordinate, GridEditor, ViewMapper};
//!
//! let mut editor: GridEditor<String> =
//!     GridEditor::new(Coordinate::xy(3, 2), 0, ViewMapper::identity_2d()).unwrap();
//! editor.activate_view(0).unwrap();
//! assert_eq!(editor.visible_cells().len(), 6);
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod layout;
pub mod mapper;
pub mod observable;
pub mod render;
pub mod types;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use config::{GridConfig, ViewConfig};
pub use editor::{CellConfig, CellModel, GridEditor, LayoutChange, SearchTask, ViewId};
pub use error::{GridError, Result};
pub use layout::{GridGeometry, GridLayout, PlacedCell, StretchMode};
pub use mapper::{IterationOrder, ViewMapper};
pub use observable::{ListenerId, Observable, ReadOnly};
pub use types::*;
pub use view::{CellView, GridView};

#[cfg(target_arch = "wasm32")]
pub use wasm::GridHandle;

/// Route `tracing` output to the browser console. Safe to call twice.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    if tracing_wasm::try_set_as_global_default().is_err() {
        web_sys::console::warn_1(&JsValue::from_str("gridslice: logging already initialized"));
    }
}

/// Lay out a grid described by JSON and return its geometry as JSON.
///
/// # Errors
/// Returns an error if the config is invalid or the grid cannot be built.
#[wasm_bindgen(js_name = layoutJson)]
pub fn layout_json(config: &str) -> std::result::Result<String, JsValue> {
    let geometry = layout_config(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&geometry)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Build the grid described by `config` and return its current geometry.
///
/// # Errors
/// Any config, editor or layout error.
pub fn layout_config(config: &str) -> Result<GridGeometry> {
    let view = GridConfig::from_json(config)?.build_view()?;
    view.geometry()
        .ok_or_else(|| GridError::Config("no active view".to_string()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
