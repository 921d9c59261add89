//! Cell store for an N-dimensional grid.
//!
//! `GridEditor` owns one [`CellModel`] per coordinate ever observed and a set
//! of registered views. Activating a view walks its 2D slice, creates missing
//! records on first observation and tells every layout listener about the
//! new visible set:
//! - Records are never recreated: a coordinate reached through another view
//!   or a repeated activation yields the same record
//! - Records are never evicted while the editor lives
//! - Payload edits notify the record's own listeners only

mod cell;
mod event;
mod search;

pub use cell::{CellModel, EqualFn};
pub use event::{CellConfig, LayoutChange};
pub use search::{SearchTask, SEARCH_BATCH};

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::{GridError, Result};
use crate::mapper::ViewMapper;
use crate::observable::{ListenerId, Observable, ReadOnly};
use crate::types::{Coordinate, Size};

use event::LayoutListeners;

/// Identifier of a registered view.
pub type ViewId = u32;

struct ActiveView<T> {
    id: ViewId,
    mapper: Rc<ViewMapper>,
    cells: Vec<CellModel<T>>,
    config: CellConfig,
}

/// Store of all cell records plus the registered views over them.
pub struct GridEditor<T> {
    dimensions: Coordinate,
    equal: EqualFn<T>,
    /// Records in creation order.
    cells: Vec<CellModel<T>>,
    index: HashMap<Coordinate, usize>,
    views: HashMap<ViewId, Rc<ViewMapper>>,
    active: Option<ActiveView<T>>,
    scale: Rc<Observable<f32>>,
    listeners: LayoutListeners<T>,
}

impl<T: PartialEq + 'static> GridEditor<T> {
    /// Create an editor comparing payloads with `PartialEq`.
    ///
    /// `dimensions` holds the extent of every axis. The initial view is
    /// registered but not activated.
    ///
    /// # Errors
    /// `Dimensionality` for fewer than two dimensions, or any error of
    /// [`GridEditor::register_view`].
    pub fn new(dimensions: Coordinate, view_id: ViewId, mapper: ViewMapper) -> Result<Self> {
        Self::with_equality(dimensions, view_id, mapper, Rc::new(|a: &T, b: &T| a == b))
    }
}

impl<T: 'static> GridEditor<T> {
    /// Create an editor comparing payloads with `equal`.
    ///
    /// # Errors
    /// Same as [`GridEditor::new`].
    pub fn with_equality(
        dimensions: Coordinate,
        view_id: ViewId,
        mapper: ViewMapper,
        equal: EqualFn<T>,
    ) -> Result<Self> {
        if dimensions.dimensions() < 2 {
            return Err(GridError::Dimensionality {
                actual: dimensions.dimensions(),
            });
        }
        let mut editor = Self {
            dimensions,
            equal,
            cells: Vec::new(),
            index: HashMap::new(),
            views: HashMap::new(),
            active: None,
            scale: Rc::new(Observable::new(1.0)),
            listeners: LayoutListeners::new(),
        };
        editor.register_view(view_id, mapper)?;
        Ok(editor)
    }

    /// Associate `id` with `mapper`, returning the mapper it replaces.
    ///
    /// The active view is not touched, even if `id` is the active id; the new
    /// mapper takes effect on the next activation.
    ///
    /// # Errors
    /// `AxisOutOfRange` if the mapper addresses an axis the store lacks.
    pub fn register_view(
        &mut self,
        id: ViewId,
        mapper: ViewMapper,
    ) -> Result<Option<Rc<ViewMapper>>> {
        let dims = self.dimensions.dimensions();
        if mapper.max_axis() >= dims {
            return Err(GridError::AxisOutOfRange {
                axis: mapper.max_axis(),
                dimensions: dims,
            });
        }
        tracing::debug!(
            view_id = id,
            horizontal_axis = mapper.horizontal_axis(),
            vertical_axis = mapper.vertical_axis(),
            "register view"
        );
        Ok(self.views.insert(id, Rc::new(mapper)))
    }

    /// Make `id` the active view and emit a reinit layout change.
    ///
    /// # Errors
    /// - `UnknownView` if `id` was never registered; nothing changes
    /// - `DimensionMismatch` if the mapper produces a coordinate of the wrong
    ///   arity; no record is created and the previous view stays active
    /// - `DuplicateCoordinate` if the mapper reaches one coordinate twice;
    ///   likewise nothing is created
    pub fn activate_view(&mut self, id: ViewId) -> Result<()> {
        let Some(mapper) = self.views.get(&id).map(Rc::clone) else {
            tracing::warn!(view_id = id, "activate_view: unknown view");
            return Err(GridError::UnknownView(id));
        };
        let _span = tracing::debug_span!("activate_view", view_id = id).entered();

        let column_count = self.extent(mapper.horizontal_axis())?;
        let row_count = self.extent(mapper.vertical_axis())?;
        let cells = self.materialize(&mapper, column_count, row_count)?;

        let config = CellConfig {
            aspect_ratio: mapper.aspect_ratio(),
            min_cell_size: mapper.min_cell_size(),
            scale: self.scale.get(),
            column_count,
            row_count,
        };
        self.active = Some(ActiveView {
            id,
            mapper,
            cells,
            config,
        });
        self.emit(true);
        Ok(())
    }

    /// Walk the view in render order and collect its records, creating the
    /// missing ones. Validates every coordinate before creating any record.
    fn materialize(
        &mut self,
        mapper: &ViewMapper,
        column_count: u32,
        row_count: u32,
    ) -> Result<Vec<CellModel<T>>> {
        let traversal = mapper.traverse(column_count, row_count);
        let mut coordinates = Vec::with_capacity(traversal.total());
        let mut seen = HashSet::with_capacity(traversal.total());
        for (column, row) in traversal {
            let coordinate = mapper.convert(column, row);
            self.verify_dimensions(&coordinate)?;
            if !seen.insert(coordinate.clone()) {
                return Err(GridError::DuplicateCoordinate {
                    coordinate: coordinate.to_string(),
                    column,
                    row,
                });
            }
            coordinates.push(coordinate);
        }

        let before = self.cells.len();
        let cells: Vec<CellModel<T>> = coordinates
            .into_iter()
            .map(|c| self.get_or_create(c))
            .collect();
        tracing::debug!(
            visible = cells.len(),
            created = self.cells.len() - before,
            total = self.cells.len(),
            "materialized view"
        );
        Ok(cells)
    }

    fn get_or_create(&mut self, coordinate: Coordinate) -> CellModel<T> {
        if let Some(cell) = self.index.get(&coordinate).and_then(|&i| self.cells.get(i)) {
            return cell.clone();
        }
        let cell = CellModel::new(coordinate.clone(), Rc::clone(&self.equal));
        self.index.insert(coordinate, self.cells.len());
        self.cells.push(cell.clone());
        cell
    }

    fn verify_dimensions(&self, coordinate: &Coordinate) -> Result<()> {
        if coordinate.dimensions() != self.dimensions.dimensions() {
            return Err(GridError::DimensionMismatch {
                expected: self.dimensions.dimensions(),
                actual: coordinate.dimensions(),
                coordinate: coordinate.to_string(),
            });
        }
        Ok(())
    }

    fn extent(&self, axis: usize) -> Result<u32> {
        self.dimensions.get(axis).ok_or(GridError::AxisOutOfRange {
            axis,
            dimensions: self.dimensions.dimensions(),
        })
    }

    fn emit(&mut self, reinit: bool) {
        let Some(active) = &self.active else {
            return;
        };
        let change = LayoutChange {
            reinit,
            view_id: active.id,
            coordinates: active.cells.iter().map(|c| c.position().clone()).collect(),
            cells: active.cells.clone(),
            config: active.config,
            mapper: Rc::clone(&active.mapper),
        };
        self.listeners.emit(&change);
    }

    // ------------------------------------------------------------------
    // Direct cell access
    // ------------------------------------------------------------------

    /// Record at `coordinate`, if it was ever observed.
    pub fn cell(&self, coordinate: &Coordinate) -> Option<CellModel<T>> {
        self.index
            .get(coordinate)
            .and_then(|&i| self.cells.get(i))
            .cloned()
    }

    /// Record at `coordinate`, created if missing.
    ///
    /// # Errors
    /// `DimensionMismatch` if the arity differs from the store's.
    pub fn cell_or_create(&mut self, coordinate: Coordinate) -> Result<CellModel<T>> {
        self.verify_dimensions(&coordinate)?;
        Ok(self.get_or_create(coordinate))
    }

    /// Set the payload at `coordinate`, creating the record if missing.
    ///
    /// Only the record's own listeners are notified.
    ///
    /// # Errors
    /// `DimensionMismatch` if the arity differs from the store's.
    pub fn set_data(&mut self, coordinate: Coordinate, data: Option<T>) -> Result<CellModel<T>>
    where
        T: Clone,
    {
        let cell = self.cell_or_create(coordinate)?;
        cell.set_data(data);
        Ok(cell)
    }

    /// Clear the payload at `coordinate`. The record itself stays.
    pub fn clear_data(&mut self, coordinate: &Coordinate) -> Option<T>
    where
        T: Clone,
    {
        self.cell(coordinate).and_then(|c| c.clear_data())
    }

    // ------------------------------------------------------------------
    // Scale
    // ------------------------------------------------------------------

    /// Scale shared by every view of this editor.
    ///
    /// Read-only: the value changes through [`GridEditor::set_scale`] only.
    pub fn scale(&self) -> ReadOnly<f32> {
        ReadOnly::new(Rc::clone(&self.scale))
    }

    /// Store a new scale (absolute value) and emit a geometry-only layout change.
    ///
    /// Non-finite values are ignored.
    pub fn set_scale(&mut self, value: f32) {
        if !value.is_finite() {
            tracing::warn!(value, "set_scale: ignoring non-finite scale");
            return;
        }
        let value = value.abs();
        self.scale.set(value);
        if let Some(active) = &mut self.active {
            active.config.scale = value;
        }
        self.emit(false);
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Register a handler for layout changes. Handlers run synchronously, in
    /// registration order.
    pub fn add_layout_listener(
        &mut self,
        listener: impl FnMut(&LayoutChange<T>) + 'static,
    ) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    pub fn remove_layout_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn layout_listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> GridEditor<T> {
    // ------------------------------------------------------------------
    // Projections through the active view
    // ------------------------------------------------------------------

    /// Extent of every axis.
    pub fn dimensions(&self) -> &Coordinate {
        &self.dimensions
    }

    pub fn active_view_id(&self) -> Option<ViewId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn active_mapper(&self) -> Option<Rc<ViewMapper>> {
        self.active.as_ref().map(|a| Rc::clone(&a.mapper))
    }

    pub fn view(&self, id: ViewId) -> Option<Rc<ViewMapper>> {
        self.views.get(&id).map(Rc::clone)
    }

    pub fn has_view(&self, id: ViewId) -> bool {
        self.views.contains_key(&id)
    }

    /// Registered view ids, ascending.
    pub fn view_ids(&self) -> Vec<ViewId> {
        let mut ids: Vec<ViewId> = self.views.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Column of `coordinate` in the active view.
    pub fn column_of(&self, coordinate: &Coordinate) -> Option<u32> {
        self.active.as_ref()?.mapper.column_of(coordinate)
    }

    /// Row of `coordinate` in the active view.
    pub fn row_of(&self, coordinate: &Coordinate) -> Option<u32> {
        self.active.as_ref()?.mapper.row_of(coordinate)
    }

    /// Columns of the active view (0 without one).
    pub fn column_count(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.config.column_count)
    }

    /// Rows of the active view (0 without one).
    pub fn row_count(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.config.row_count)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.active.as_ref().map_or(1.0, |a| a.mapper.aspect_ratio())
    }

    pub fn min_cell_size(&self) -> Option<Size> {
        self.active.as_ref()?.mapper.min_cell_size()
    }

    /// Layout configuration of the active view.
    pub fn config(&self) -> Option<CellConfig> {
        self.active.as_ref().map(|a| a.config)
    }

    /// Records of the active view in render order.
    pub fn visible_cells(&self) -> &[CellModel<T>] {
        self.active.as_ref().map_or(&[], |a| a.cells.as_slice())
    }

    pub fn visible_coordinates(&self) -> Vec<Coordinate> {
        self.visible_cells()
            .iter()
            .map(|c| c.position().clone())
            .collect()
    }

    /// All records in creation order.
    pub fn cells(&self) -> impl Iterator<Item = &CellModel<T>> {
        self.cells.iter()
    }

    /// Number of records ever created.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn editor_3x2() -> GridEditor<String> {
        GridEditor::new(Coordinate::xy(3, 2), 0, ViewMapper::identity_2d()).unwrap()
    }

    #[test]
    fn test_new_registers_without_activating() {
        let editor = editor_3x2();
        assert!(editor.has_view(0));
        assert_eq!(editor.active_view_id(), None);
        assert_eq!(editor.column_count(), 0);
        assert!(editor.is_empty());
    }

    #[test]
    fn test_rejects_single_dimension() {
        let result = GridEditor::<i32>::new(Coordinate::from([5]), 0, ViewMapper::identity_2d());
        assert!(matches!(result, Err(GridError::Dimensionality { actual: 1 })));
    }

    #[test]
    fn test_register_view_checks_axes() {
        let mut editor = editor_3x2();
        let mapper = ViewMapper::slice(Coordinate::zeros(3), 0, 2).unwrap();
        assert!(matches!(
            editor.register_view(1, mapper),
            Err(GridError::AxisOutOfRange { axis: 2, dimensions: 2 })
        ));
    }

    #[test]
    fn test_activate_emits_reinit() {
        let mut editor = editor_3x2();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        editor.add_layout_listener(move |e| {
            s.borrow_mut().push((e.reinit, e.coordinates.len(), e.config.column_count))
        });

        editor.activate_view(0).unwrap();
        assert_eq!(*seen.borrow(), vec![(true, 6, 3)]);
        assert_eq!(editor.len(), 6);
    }

    #[test]
    fn test_set_scale_emits_geometry_only_change() {
        let mut editor = editor_3x2();
        editor.activate_view(0).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        editor.add_layout_listener(move |e| s.borrow_mut().push((e.reinit, e.config.scale)));

        editor.set_scale(-2.0);
        editor.set_scale(f32::INFINITY);
        assert_eq!(*seen.borrow(), vec![(false, 2.0)]);
        assert_eq!(editor.scale().get(), 2.0);
    }

    #[test]
    fn test_scale_handle_observes_set_scale() {
        let mut editor = editor_3x2();
        editor.activate_view(0).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        let e = Rc::clone(&events);
        editor.add_layout_listener(move |c| e.borrow_mut().push(c.config.scale));

        let scale = editor.scale();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        scale.subscribe(move |_, new| s.borrow_mut().push(*new));

        editor.set_scale(-4.0);
        assert_eq!(scale.get(), 4.0);
        assert_eq!(*seen.borrow(), vec![4.0]);
        assert_eq!(*events.borrow(), vec![4.0]);
        assert_eq!(editor.config().unwrap().scale, 4.0);
    }

    #[test]
    fn test_set_scale_without_active_view_is_silent() {
        let mut editor = editor_3x2();
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        editor.add_layout_listener(move |_| *h.borrow_mut() += 1);
        editor.set_scale(3.0);
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(editor.scale().get(), 3.0);
    }

    #[test]
    fn test_payload_edit_does_not_fire_layout_listeners() {
        let mut editor = editor_3x2();
        editor.activate_view(0).unwrap();
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        editor.add_layout_listener(move |_| *h.borrow_mut() += 1);

        editor.set_data(Coordinate::xy(1, 1), Some("v".into())).unwrap();
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(
            editor.cell(&Coordinate::xy(1, 1)).unwrap().data().as_deref(),
            Some("v")
        );
    }

    #[test]
    fn test_remove_layout_listener() {
        let mut editor = editor_3x2();
        let id = editor.add_layout_listener(|_| {});
        assert_eq!(editor.layout_listener_count(), 1);
        assert!(editor.remove_layout_listener(id));
        assert_eq!(editor.layout_listener_count(), 0);
    }
}
