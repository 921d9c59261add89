//! JSON configuration for a whole grid.
//!
//! ```json
//! {
//!   "dimensions": [4, 3, 2],
//!   "views": [
//!     { "id": 0, "horizontalAxis": 0, "verticalAxis": 1, "fixed": [0, 0, 1] },
//!     { "id": 1, "horizontalAxis": 2, "verticalAxis": 1, "reverseVertical": true }
//!   ],
//!   "activeView": 1,
//!   "scale": 1.5,
//!   "cells": [{ "coordinate": [1, 2, 0], "value": "hello" }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::editor::{GridEditor, ViewId};
use crate::error::{GridError, Result};
use crate::layout::StretchMode;
use crate::mapper::{IterationOrder, ViewMapper};
use crate::types::{Coordinate, Size};
use crate::view::GridView;

/// Container used when the config names no `container`.
pub const DEFAULT_CONTAINER: Size = Size {
    width: 800.0,
    height: 600.0,
};

fn default_scale() -> f32 {
    1.0
}

fn default_aspect_ratio() -> f32 {
    1.0
}

fn default_vertical_axis() -> usize {
    1
}

/// One registered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub id: ViewId,
    #[serde(default)]
    pub horizontal_axis: usize,
    #[serde(default = "default_vertical_axis")]
    pub vertical_axis: usize,
    /// Values of the non-selected axes (zeros if absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Vec<u32>>,
    #[serde(default)]
    pub reverse_horizontal: bool,
    #[serde(default)]
    pub reverse_vertical: bool,
    #[serde(default)]
    pub order: IterationOrder,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_cell_size: Option<Size>,
}

impl ViewConfig {
    /// Identity view over axes 0/1.
    pub fn identity(id: ViewId) -> Self {
        Self {
            id,
            horizontal_axis: 0,
            vertical_axis: 1,
            fixed: None,
            reverse_horizontal: false,
            reverse_vertical: false,
            order: IterationOrder::default(),
            aspect_ratio: 1.0,
            min_cell_size: None,
        }
    }
}

/// Initial payload for one coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSeed {
    pub coordinate: Vec<u32>,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    /// Extent of every axis.
    pub dimensions: Vec<u32>,
    #[serde(default)]
    pub views: Vec<ViewConfig>,
    /// View to activate; the first view if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_view: Option<ViewId>,
    #[serde(default)]
    pub stretch: StretchMode,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Size>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<CellSeed>,
}

impl GridConfig {
    /// # Errors
    /// `Json` on malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    /// `Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Views to register: the configured ones, or a single identity view.
    pub fn effective_views(&self) -> Vec<ViewConfig> {
        if self.views.is_empty() {
            vec![ViewConfig::identity(0)]
        } else {
            self.views.clone()
        }
    }

    /// Container size a view built from this config starts with.
    pub fn container_size(&self) -> Size {
        self.container.unwrap_or(DEFAULT_CONTAINER)
    }

    /// Mapper for `view` in this config's coordinate space.
    ///
    /// # Errors
    /// - `Config` if `fixed` does not have one value per dimension
    /// - `InvalidAxes` / `AxisOutOfRange` from [`ViewMapper::slice`]
    pub fn to_mapper(&self, view: &ViewConfig) -> Result<ViewMapper> {
        let template = match &view.fixed {
            Some(fixed) if fixed.len() != self.dimensions.len() => {
                return Err(GridError::Config(format!(
                    "view {}: fixed has {} values, grid has {} dimensions",
                    view.id,
                    fixed.len(),
                    self.dimensions.len()
                )));
            }
            Some(fixed) => Coordinate::new(fixed.clone()),
            None => Coordinate::zeros(self.dimensions.len()),
        };
        let mut mapper = ViewMapper::slice(template, view.horizontal_axis, view.vertical_axis)?
            .reversed_horizontal(view.reverse_horizontal)
            .reversed_vertical(view.reverse_vertical)
            .with_order(view.order)
            .with_aspect_ratio(view.aspect_ratio);
        if let Some(min) = view.min_cell_size {
            mapper = mapper.with_min_cell_size(min);
        }
        Ok(mapper)
    }

    /// Editor with every view registered, the scale applied and the chosen
    /// view active.
    ///
    /// # Errors
    /// Any mapper or editor error, `UnknownView` if `activeView` names no
    /// configured view, `Config` for duplicate view ids.
    pub fn build_editor<T: PartialEq + 'static>(&self) -> Result<GridEditor<T>> {
        let views = self.effective_views();
        let Some((first, rest)) = views.split_first() else {
            return Err(GridError::Config("no views".to_string()));
        };

        let dimensions = Coordinate::new(self.dimensions.clone());
        let mut editor = GridEditor::new(dimensions, first.id, self.to_mapper(first)?)?;
        for view in rest {
            if editor.has_view(view.id) {
                return Err(GridError::Config(format!("duplicate view id {}", view.id)));
            }
            editor.register_view(view.id, self.to_mapper(view)?)?;
        }

        editor.set_scale(self.scale);
        editor.activate_view(self.active_view.unwrap_or(first.id))?;
        Ok(editor)
    }

    /// [`GridConfig::build_editor`] over JSON payloads, seeded with `cells`.
    ///
    /// # Errors
    /// Same as `build_editor`, plus `DimensionMismatch` for a bad seed.
    pub fn build_value_editor(&self) -> Result<GridEditor<serde_json::Value>> {
        let mut editor = self.build_editor()?;
        for seed in &self.cells {
            editor.set_data(Coordinate::new(seed.coordinate.clone()), Some(seed.value.clone()))?;
        }
        tracing::debug!(seeded = self.cells.len(), "built value editor");
        Ok(editor)
    }

    /// Shared value editor plus a view laid out per `stretch`, `fixedSize`
    /// and `container`, labelling each cell with [`value_label`].
    ///
    /// # Errors
    /// Same as [`GridConfig::build_value_editor`].
    pub fn build_view(&self) -> Result<GridView<serde_json::Value>> {
        let editor = Rc::new(RefCell::new(self.build_value_editor()?));
        let view = GridView::new(editor, self.container_size());
        view.set_cell_renderer(|cell| cell.label = cell.data().map(value_label));
        view.set_stretch_mode(self.stretch);
        if let Some(fixed) = self.fixed_size {
            // Pinning resets the scale, so restore the configured one
            view.scale_to_size(fixed.width, fixed.height);
            view.editor().borrow_mut().set_scale(self.scale);
        }
        Ok(view)
    }
}

/// Text shown for a JSON payload: strings verbatim, anything else as JSON.
pub fn value_label(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
