//! Presentation handle for one visible cell.

use std::fmt;

use crate::editor::CellModel;
use crate::observable::ListenerId;
use crate::render::CssColor;
use crate::types::{CellRect, Coordinate};

/// One visible cell of a [`super::GridView`].
///
/// Bound to its record for as long as the view shows the current slice. The
/// cell renderer fills in [`CellView::label`] and [`CellView::fill`]; both stay
/// `None` when no renderer is set.
pub struct CellView<T> {
    pub(crate) model: CellModel<T>,
    pub(crate) index: usize,
    pub(crate) column: u32,
    pub(crate) row: u32,
    pub(crate) rect: CellRect,
    pub(crate) data: Option<T>,
    pub(crate) listener: Option<ListenerId>,
    /// Text drawn inside the cell.
    pub label: Option<String>,
    /// Background color.
    pub fill: Option<CssColor>,
}

impl<T> CellView<T> {
    pub(crate) fn new(
        model: CellModel<T>,
        index: usize,
        column: u32,
        row: u32,
        data: Option<T>,
    ) -> Self {
        Self {
            model,
            index,
            column,
            row,
            rect: CellRect::default(),
            data,
            listener: None,
            label: None,
            fill: None,
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        self.model.position()
    }

    /// Position in render order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    /// Pixel bounds from the latest layout pass.
    pub fn rect(&self) -> CellRect {
        self.rect
    }

    /// Record backing this cell.
    pub fn model(&self) -> &CellModel<T> {
        &self.model
    }

    /// Payload as of the last notification.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    /// Drop whatever the renderer produced.
    pub fn clear(&mut self) {
        self.label = None;
        self.fill = None;
    }

    /// Detach from the record-level channel.
    pub(crate) fn unbind(&mut self) {
        if let Some(id) = self.listener.take() {
            self.model.unsubscribe(id);
        }
    }
}

impl<T: Clone> Clone for CellView<T> {
    /// Snapshot of the cell. The clone is not bound to the record.
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            index: self.index,
            column: self.column,
            row: self.row,
            rect: self.rect,
            data: self.data.clone(),
            listener: None,
            label: self.label.clone(),
            fill: self.fill.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CellView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellView")
            .field("coordinate", self.coordinate())
            .field("index", &self.index)
            .field("column", &self.column)
            .field("row", &self.row)
            .field("rect", &self.rect)
            .field("data", &self.data)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
