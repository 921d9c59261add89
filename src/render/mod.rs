//! Rendering engine with pluggable backends.
//!
//! This module provides:
//! - Backend-agnostic rendering trait and per-cell render data
//! - SVG backend (native, used by the CLI)
//! - Canvas 2D backend (wasm32)

pub mod backend;
pub mod svg;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use backend::{CellRenderData, CssColor, Palette, RenderBackend};
pub use svg::SvgBackend;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasBackend;
