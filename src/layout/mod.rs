//! Layout engine for computing cell geometry.
//!
//! This module handles:
//! - Deriving one uniform cell size from container size, aspect ratio,
//!   minimum size, stretch mode and scale
//! - Carrying the cell size forward proportionally across container resizes
//! - Placing every visible cell at `(column * width, row * height)`
//! - Hit testing on the resulting grid

mod geometry;
mod grid_layout;

pub use geometry::{GridGeometry, PlacedCell};
pub use grid_layout::{cell_size_for, GridLayout, StretchMode};
