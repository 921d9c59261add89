//! Value types shared by the editor, mapper and layout engine.

mod coordinate;
mod geometry;

pub use coordinate::*;
pub use geometry::*;
