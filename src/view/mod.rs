//! Presentation layer for the active view.
//!
//! `GridView` listens on two channels:
//! - the editor's layout channel: a reinit change rebuilds every [`CellView`]
//!   and rebinds it to its record, a geometry-only change re-runs the layout
//! - each visible record's payload channel: re-runs the cell renderer for that
//!   one cell
//!
//! Both handlers hold only weak references to the view's state, so dropping a
//! `GridView` detaches it from the editor and from every record.

mod cell_view;

pub use cell_view::CellView;

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

use crate::editor::{GridEditor, LayoutChange, ViewId};
use crate::error::Result;
use crate::layout::{GridGeometry, GridLayout, StretchMode};
use crate::observable::ListenerId;
use crate::render::{CellRenderData, RenderBackend};
use crate::types::{CellRect, Coordinate, Size};

/// Fills in the presentation of a cell view. Runs when the view is created and
/// whenever its record's payload changes.
///
/// Renderers must not borrow the editor or write the payload being rendered.
pub type CellRenderer<T> = Rc<dyn Fn(&mut CellView<T>)>;

struct ViewState<T> {
    layout: GridLayout,
    container: Size,
    scrollable: bool,
    renderer: Option<CellRenderer<T>>,
    cells: Vec<CellView<T>>,
    by_coordinate: HashMap<Coordinate, usize>,
    geometry: Option<GridGeometry>,
    change: Option<LayoutChange<T>>,
}

impl<T: Clone> ViewState<T> {
    fn new(container: Size) -> Self {
        Self {
            layout: GridLayout::default(),
            container,
            scrollable: false,
            renderer: None,
            cells: Vec::new(),
            by_coordinate: HashMap::new(),
            geometry: None,
            change: None,
        }
    }

    fn unbind_all(&mut self) {
        for cell in &mut self.cells {
            cell.unbind();
        }
    }

    fn relayout(&mut self) {
        let Some(change) = self.change.as_ref() else {
            return;
        };
        match self.layout.arrange(
            &change.coordinates,
            &change.mapper,
            &change.config,
            self.container,
        ) {
            Ok(geometry) => {
                for (cell, placed) in self.cells.iter_mut().zip(&geometry.cells) {
                    cell.rect = placed.rect;
                    cell.column = placed.column;
                    cell.row = placed.row;
                }
                self.geometry = Some(geometry);
            }
            Err(e) => {
                tracing::error!(
                    view_id = change.view_id,
                    error = %e,
                    "layout skipped, keeping previous geometry"
                );
            }
        }
    }

    fn refresh(&mut self, coordinate: &Coordinate, data: Option<T>) {
        let renderer = self.renderer.clone();
        let Some(cell) = self
            .by_coordinate
            .get(coordinate)
            .and_then(|&i| self.cells.get_mut(i))
        else {
            return;
        };
        cell.data = data;
        apply_renderer(renderer.as_ref(), cell);
    }

    fn render_all(&mut self) {
        let renderer = self.renderer.clone();
        for cell in &mut self.cells {
            apply_renderer(renderer.as_ref(), cell);
        }
    }

    fn preferred_size(&self) -> Size {
        if self.scrollable {
            self.geometry
                .as_ref()
                .map_or(Size::ZERO, GridGeometry::content_size)
        } else {
            self.layout.effective_container(self.container)
        }
    }
}

fn apply_renderer<T>(renderer: Option<&CellRenderer<T>>, cell: &mut CellView<T>) {
    match renderer {
        Some(render) => render(cell),
        None => cell.clear(),
    }
}

/// Weak link from editor and record listeners back to a view's state.
struct Binding<T> {
    state: Weak<RefCell<ViewState<T>>>,
    /// Payload changes that arrived while the state was busy.
    pending: Rc<RefCell<VecDeque<Coordinate>>>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
            pending: Rc::clone(&self.pending),
        }
    }
}

impl<T: Clone + 'static> Binding<T> {
    fn on_layout(&self, change: &LayoutChange<T>) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        {
            let Ok(mut s) = state.try_borrow_mut() else {
                tracing::error!(
                    view_id = change.view_id,
                    "layout change while the view is busy, dropped"
                );
                return;
            };
            if change.reinit {
                self.rebind(&mut s, change);
            }
            s.change = Some(change.clone());
            s.relayout();
        }
        self.flush(&state);
    }

    fn rebind(&self, state: &mut ViewState<T>, change: &LayoutChange<T>) {
        state.unbind_all();
        state.cells.clear();
        state.by_coordinate.clear();

        let renderer = state.renderer.clone();
        for (index, model) in change.cells.iter().enumerate() {
            let column = change.mapper.column_of(model.position()).unwrap_or(0);
            let row = change.mapper.row_of(model.position()).unwrap_or(0);
            let mut cell = CellView::new(model.clone(), index, column, row, model.data());

            let binding = self.clone();
            let coordinate = model.position().clone();
            cell.listener = Some(model.subscribe(move |_, now| {
                binding.on_payload(&coordinate, now);
            }));
            apply_renderer(renderer.as_ref(), &mut cell);

            state.by_coordinate.insert(model.position().clone(), index);
            state.cells.push(cell);
        }
        tracing::debug!(
            view_id = change.view_id,
            cells = state.cells.len(),
            "rebound cell views"
        );
    }

    fn on_payload(&self, coordinate: &Coordinate, now: &Option<T>) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        {
            let Ok(mut s) = state.try_borrow_mut() else {
                self.pending.borrow_mut().push_back(coordinate.clone());
                return;
            };
            s.refresh(coordinate, now.clone());
        }
        self.flush(&state);
    }

    /// Re-render cells whose payload changed while the state was borrowed.
    fn flush(&self, state: &RefCell<ViewState<T>>) {
        loop {
            let Some(coordinate) = self.pending.borrow_mut().pop_front() else {
                return;
            };
            let Ok(mut s) = state.try_borrow_mut() else {
                self.pending.borrow_mut().push_front(coordinate);
                return;
            };
            let data = s
                .by_coordinate
                .get(&coordinate)
                .and_then(|&i| s.cells.get(i))
                .and_then(|c| c.model.data());
            s.refresh(&coordinate, data);
        }
    }
}

/// Layout change describing what `editor` currently shows, if anything.
fn current_change<T>(editor: &GridEditor<T>) -> Option<LayoutChange<T>> {
    Some(LayoutChange {
        reinit: true,
        view_id: editor.active_view_id()?,
        coordinates: editor.visible_coordinates(),
        cells: editor.visible_cells().to_vec(),
        config: editor.config()?,
        mapper: editor.active_mapper()?,
    })
}

/// Uniform grid presentation of an editor's active view.
pub struct GridView<T: Clone + 'static> {
    editor: Rc<RefCell<GridEditor<T>>>,
    state: Rc<RefCell<ViewState<T>>>,
    binding: Binding<T>,
    listener: ListenerId,
}

impl<T: Clone + 'static> GridView<T> {
    /// Attach to `editor`, laid out inside `container`.
    ///
    /// If the editor already has an active view it is picked up immediately.
    /// The editor must not be borrowed while this runs.
    pub fn new(editor: Rc<RefCell<GridEditor<T>>>, container: Size) -> Self {
        let state = Rc::new(RefCell::new(ViewState::new(container)));
        let binding = Binding {
            state: Rc::downgrade(&state),
            pending: Rc::new(RefCell::new(VecDeque::new())),
        };

        let initial = current_change(&editor.borrow());
        let on_change = binding.clone();
        let listener = editor
            .borrow_mut()
            .add_layout_listener(move |change| on_change.on_layout(change));
        if let Some(change) = initial {
            binding.on_layout(&change);
        }

        Self {
            editor,
            state,
            binding,
            listener,
        }
    }

    pub fn editor(&self) -> Rc<RefCell<GridEditor<T>>> {
        Rc::clone(&self.editor)
    }

    /// Activate a view on the underlying editor.
    ///
    /// # Errors
    /// See [`GridEditor::activate_view`].
    pub fn activate_view(&self, id: ViewId) -> Result<()> {
        self.editor.borrow_mut().activate_view(id)
    }

    // ------------------------------------------------------------------
    // Renderer
    // ------------------------------------------------------------------

    /// Install the cell renderer and run it on every current cell.
    pub fn set_cell_renderer(&self, renderer: impl Fn(&mut CellView<T>) + 'static) {
        {
            let mut state = self.state.borrow_mut();
            state.renderer = Some(Rc::new(renderer));
            state.render_all();
        }
        self.binding.flush(&self.state);
    }

    /// Remove the cell renderer; cells are left empty.
    pub fn clear_cell_renderer(&self) {
        let mut state = self.state.borrow_mut();
        state.renderer = None;
        state.render_all();
    }

    // ------------------------------------------------------------------
    // Geometry configuration
    // ------------------------------------------------------------------

    pub fn stretch_mode(&self) -> StretchMode {
        self.state.borrow().layout.stretch_mode()
    }

    pub fn set_stretch_mode(&self, stretch: StretchMode) {
        let mut state = self.state.borrow_mut();
        state.layout.set_stretch_mode(stretch);
        state.relayout();
    }

    /// Current value of the editor's shared scale.
    pub fn scale(&self) -> f32 {
        self.editor.borrow().scale().get()
    }

    /// Drop any pinned size, then set the shared scale.
    pub fn set_scale(&self, value: f32) {
        self.state.borrow_mut().layout.clear_fixed_size();
        self.editor.borrow_mut().set_scale(value);
        if !value.is_finite() {
            // Rejected by the editor, so no change event arrives.
            self.state.borrow_mut().relayout();
        }
    }

    /// Pin the layout to `width x height` and reset the scale to 1.
    pub fn scale_to_size(&self, width: f32, height: f32) {
        self.state.borrow_mut().layout.scale_to_size(width, height);
        self.editor.borrow_mut().set_scale(1.0);
    }

    pub fn fixed_size(&self) -> Option<Size> {
        self.state.borrow().layout.fixed_size()
    }

    /// New container size (negative values treated as zero).
    pub fn resize(&self, width: f32, height: f32) {
        let mut state = self.state.borrow_mut();
        state.container = Size::new(width.max(0.0), height.max(0.0));
        state.relayout();
    }

    pub fn container(&self) -> Size {
        self.state.borrow().container
    }

    pub fn set_scrollable(&self, scrollable: bool) {
        self.state.borrow_mut().scrollable = scrollable;
    }

    pub fn is_scrollable(&self) -> bool {
        self.state.borrow().scrollable
    }

    /// Content size when scrollable, otherwise the (possibly pinned) container.
    pub fn preferred_size(&self) -> Size {
        self.state.borrow().preferred_size()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn geometry(&self) -> Option<GridGeometry> {
        self.state.borrow().geometry.clone()
    }

    /// Bounds of the cell at `(column, row)`.
    pub fn cell_bounds(&self, column: u32, row: u32) -> Option<CellRect> {
        self.state.borrow().geometry.as_ref()?.rect_at(column, row)
    }

    /// Snapshot of the cell view showing `coordinate`.
    pub fn cell_view(&self, coordinate: &Coordinate) -> Option<CellView<T>> {
        let state = self.state.borrow();
        state
            .by_coordinate
            .get(coordinate)
            .and_then(|&i| state.cells.get(i))
            .cloned()
    }

    /// Snapshot of every cell view in render order.
    pub fn cell_views(&self) -> Vec<CellView<T>> {
        self.state.borrow().cells.clone()
    }

    /// Cell view under the point `(x, y)`.
    pub fn cell_at_point(&self, x: f32, y: f32) -> Option<CellView<T>> {
        let coordinate = {
            let state = self.state.borrow();
            let geometry = state.geometry.as_ref()?;
            let (column, row) = geometry.cell_at_point(x, y)?;
            geometry.placed_at(column, row)?.coordinate.clone()
        };
        self.cell_view(&coordinate)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().cells.is_empty()
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Draw every cell in render order.
    ///
    /// # Errors
    /// Whatever the backend reports.
    pub fn render(&self, backend: &mut dyn RenderBackend) -> Result<()> {
        let state = self.state.borrow();
        backend.begin_frame(state.preferred_size())?;
        for cell in &state.cells {
            backend.draw_cell(&CellRenderData {
                coordinate: cell.coordinate().clone(),
                column: cell.column,
                row: cell.row,
                rect: cell.rect,
                label: cell.label.clone(),
                fill: cell.fill.clone(),
                has_data: cell.data.is_some(),
            })?;
        }
        backend.end_frame()
    }
}

impl<T: Clone + 'static> Drop for GridView<T> {
    fn drop(&mut self) {
        if let Ok(mut editor) = self.editor.try_borrow_mut() {
            editor.remove_layout_listener(self.listener);
        }
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.unbind_all();
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::mapper::ViewMapper;

    fn shared_editor() -> Rc<RefCell<GridEditor<i32>>> {
        let editor = GridEditor::new(Coordinate::xy(3, 2), 0, ViewMapper::identity_2d()).unwrap();
        Rc::new(RefCell::new(editor))
    }

    #[test]
    fn test_view_follows_activation() {
        let editor = shared_editor();
        let view = GridView::new(Rc::clone(&editor), Size::new(300.0, 300.0));
        assert!(view.is_empty());

        view.activate_view(0).unwrap();
        assert_eq!(view.len(), 6);
        assert_eq!(
            view.cell_bounds(1, 1),
            Some(CellRect::new(100.0, 100.0, 100.0, 100.0))
        );
    }

    #[test]
    fn test_picks_up_already_active_view() {
        let editor = shared_editor();
        editor.borrow_mut().activate_view(0).unwrap();
        let view = GridView::new(Rc::clone(&editor), Size::new(30.0, 30.0));
        assert_eq!(view.len(), 6);
        assert!(view.geometry().is_some());
    }

    #[test]
    fn test_renderer_reruns_on_payload_change() {
        let editor = shared_editor();
        let view = GridView::new(Rc::clone(&editor), Size::new(300.0, 200.0));
        view.set_cell_renderer(|cell| {
            cell.label = cell.data().map(|v| format!("#{v}"));
        });
        view.activate_view(0).unwrap();

        let at = Coordinate::xy(2, 0);
        assert_eq!(view.cell_view(&at).unwrap().label, None);
        editor.borrow_mut().set_data(at.clone(), Some(7)).unwrap();
        assert_eq!(view.cell_view(&at).unwrap().label.as_deref(), Some("#7"));
    }

    #[test]
    fn test_drop_detaches_listeners() {
        let editor = shared_editor();
        let view = GridView::new(Rc::clone(&editor), Size::new(10.0, 10.0));
        view.activate_view(0).unwrap();
        let cell = editor.borrow().cell(&Coordinate::xy(0, 0)).unwrap();
        assert_eq!(cell.listener_count(), 1);
        assert_eq!(editor.borrow().layout_listener_count(), 1);

        drop(view);
        assert_eq!(cell.listener_count(), 0);
        assert_eq!(editor.borrow().layout_listener_count(), 0);
    }
}
