//! Layout-change events emitted by the editor.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use super::{CellModel, ViewId};
use crate::mapper::ViewMapper;
use crate::observable::ListenerId;
use crate::types::{Coordinate, Size};

/// Layout configuration snapshot of the active view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellConfig {
    pub aspect_ratio: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cell_size: Option<Size>,
    pub scale: f32,
    pub column_count: u32,
    pub row_count: u32,
}

impl CellConfig {
    /// Number of cells a complete view holds.
    pub fn cell_count(&self) -> usize {
        let c = usize::try_from(self.column_count).unwrap_or(usize::MAX);
        let r = usize::try_from(self.row_count).unwrap_or(usize::MAX);
        c.saturating_mul(r)
    }

    /// Same geometry inputs, compared bit-wise.
    pub(crate) fn same_geometry(&self, other: &Self) -> bool {
        self.aspect_ratio.to_bits() == other.aspect_ratio.to_bits()
            && self.scale.to_bits() == other.scale.to_bits()
            && self.column_count == other.column_count
            && self.row_count == other.row_count
            && match (self.min_cell_size, other.min_cell_size) {
                (None, None) => true,
                (Some(a), Some(b)) => a.same_as(b),
                _ => false,
            }
    }
}

/// Notification that the visible slice changed.
///
/// `reinit` is true when the coordinate set itself changed (view activation);
/// false for geometry-only refreshes such as a scale change.
pub struct LayoutChange<T> {
    pub reinit: bool,
    pub view_id: ViewId,
    /// Visible coordinates in render order.
    pub coordinates: Vec<Coordinate>,
    /// Records for `coordinates`, same order.
    pub cells: Vec<CellModel<T>>,
    pub config: CellConfig,
    pub mapper: Rc<ViewMapper>,
}

impl<T> Clone for LayoutChange<T> {
    fn clone(&self) -> Self {
        Self {
            reinit: self.reinit,
            view_id: self.view_id,
            coordinates: self.coordinates.clone(),
            cells: self.cells.clone(),
            config: self.config,
            mapper: Rc::clone(&self.mapper),
        }
    }
}

type LayoutListener<T> = Box<dyn FnMut(&LayoutChange<T>)>;

/// Ordered registry of layout listeners.
pub(crate) struct LayoutListeners<T> {
    listeners: Vec<(ListenerId, LayoutListener<T>)>,
    next_id: u64,
}

impl<T> LayoutListeners<T> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn add(&mut self, listener: LayoutListener<T>) -> ListenerId {
        let id = ListenerId::new(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn emit(&mut self, change: &LayoutChange<T>) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }
}
