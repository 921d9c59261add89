//! Grid view: binding to the editor's two notification channels, geometry
//! configuration and rendering.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{editor_2d, shared, volume_editor, RecordingBackend};
use gridslice::render::SvgBackend;
use gridslice::{CellRect, Coordinate, GridView, Size, StretchMode};

#[test]
fn test_reinit_rebuilds_cell_views() {
    let editor = shared(volume_editor::<i32>([3, 2, 4]));
    let view = GridView::new(Rc::clone(&editor), Size::new(300.0, 200.0));

    view.activate_view(0).unwrap();
    assert_eq!(view.len(), 6);
    let indices: Vec<usize> = view.cell_views().iter().map(|c| c.index()).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);

    view.activate_view(2).unwrap();
    assert_eq!(view.len(), 8);
    let cell = view.cell_view(&Coordinate::from([0, 1, 3])).unwrap();
    assert_eq!((cell.column(), cell.row()), (3, 1));
    assert!(view.cell_view(&Coordinate::from([2, 0, 0])).is_none());
}

#[test]
fn test_scale_refresh_keeps_cell_views() {
    let editor = shared(editor_2d::<i32>(3, 1));
    let view = GridView::new(Rc::clone(&editor), Size::new(300.0, 100.0));
    view.activate_view(0).unwrap();

    let renders = Rc::new(RefCell::new(0));
    let r = Rc::clone(&renders);
    view.set_cell_renderer(move |_| *r.borrow_mut() += 1);
    assert_eq!(*renders.borrow(), 3);

    view.set_scale(2.0);
    // Geometry only: the renderer does not run again
    assert_eq!(*renders.borrow(), 3);
    assert_eq!(view.scale(), 2.0);
    assert_eq!(
        view.cell_bounds(2, 0),
        Some(CellRect::new(400.0, 0.0, 200.0, 200.0))
    );
}

#[test]
fn test_only_the_edited_cell_rerenders() {
    let editor = shared(editor_2d::<String>(2, 2));
    let view = GridView::new(Rc::clone(&editor), Size::new(100.0, 100.0));
    view.activate_view(0).unwrap();

    let rendered = Rc::new(RefCell::new(Vec::new()));
    let r = Rc::clone(&rendered);
    view.set_cell_renderer(move |cell| {
        r.borrow_mut().push(cell.coordinate().clone());
        cell.label = cell.data().cloned();
    });
    rendered.borrow_mut().clear();

    editor
        .borrow_mut()
        .set_data(Coordinate::xy(1, 1), Some("x".to_string()))
        .unwrap();

    assert_eq!(*rendered.borrow(), vec![Coordinate::xy(1, 1)]);
    let cell = view.cell_view(&Coordinate::xy(1, 1)).unwrap();
    assert_eq!(cell.label.as_deref(), Some("x"));
    assert_eq!(cell.data().map(String::as_str), Some("x"));
}

#[test]
fn test_no_renderer_leaves_cells_empty() {
    let editor = shared(editor_2d::<i32>(2, 1));
    editor
        .borrow_mut()
        .set_data(Coordinate::xy(0, 0), Some(5))
        .unwrap();
    let view = GridView::new(Rc::clone(&editor), Size::new(100.0, 100.0));
    view.activate_view(0).unwrap();

    view.set_cell_renderer(|cell| cell.set_label("label"));
    view.clear_cell_renderer();
    assert!(view.cell_views().iter().all(|c| c.label.is_none()));

    let mut backend = RecordingBackend::default();
    view.render(&mut backend).unwrap();
    assert!(backend.cells[0].has_data);
    assert!(!backend.cells[1].has_data);
}

#[test]
fn test_renderer_writing_other_cells_is_deferred() {
    let editor = shared(editor_2d::<i32>(2, 1));
    let view = GridView::new(Rc::clone(&editor), Size::new(100.0, 100.0));
    view.activate_view(0).unwrap();

    let other = editor.borrow().cell(&Coordinate::xy(1, 0)).unwrap();
    view.set_cell_renderer(move |cell| {
        cell.label = cell.data().map(|v| v.to_string());
        if cell.coordinate() == &Coordinate::xy(0, 0) && !other.has_data() {
            other.set_data(Some(1));
        }
    });

    let mirrored = view.cell_view(&Coordinate::xy(1, 0)).unwrap();
    assert_eq!(mirrored.label.as_deref(), Some("1"));
}

#[test]
fn test_scale_to_size_pins_and_resets_scale() {
    let editor = shared(editor_2d::<i32>(4, 2));
    let view = GridView::new(Rc::clone(&editor), Size::new(800.0, 600.0));
    view.activate_view(0).unwrap();
    view.set_scale(3.0);

    view.scale_to_size(40.0, -10.0);
    assert_eq!(view.scale(), 1.0);
    assert_eq!(view.fixed_size(), Some(Size::new(40.0, 10.0)));
    assert_eq!(view.geometry().unwrap().cell_size, Size::new(10.0, 10.0));

    // Resizing the real container has no effect while pinned
    view.resize(4000.0, 4000.0);
    assert_eq!(view.geometry().unwrap().cell_size, Size::new(10.0, 10.0));

    view.set_scale(1.0);
    assert_eq!(view.fixed_size(), None);
    assert_eq!(view.geometry().unwrap().cell_size, Size::new(1000.0, 1000.0));
}

#[test]
fn test_stretch_and_resize() {
    let editor = shared(editor_2d::<i32>(4, 2));
    let view = GridView::new(Rc::clone(&editor), Size::new(400.0, 100.0));
    view.activate_view(0).unwrap();
    assert_eq!(view.stretch_mode(), StretchMode::Horizontal);
    assert_eq!(view.cell_bounds(0, 0).unwrap().width, 100.0);

    view.set_stretch_mode(StretchMode::Vertical);
    assert_eq!(view.cell_bounds(0, 0).unwrap().width, 50.0);

    view.resize(400.0, 200.0);
    assert_eq!(view.cell_bounds(3, 1), Some(CellRect::new(300.0, 100.0, 100.0, 100.0)));
}

#[test]
fn test_preferred_size_follows_scrollable() {
    let editor = shared(editor_2d::<i32>(2, 2));
    let view = GridView::new(Rc::clone(&editor), Size::new(100.0, 300.0));
    view.activate_view(0).unwrap();

    assert_eq!(view.preferred_size(), Size::new(100.0, 300.0));
    view.set_scrollable(true);
    assert!(view.is_scrollable());
    assert_eq!(view.preferred_size(), Size::new(100.0, 100.0));
}

#[test]
fn test_cell_at_point() {
    let editor = shared(editor_2d::<i32>(3, 3));
    let view = GridView::new(Rc::clone(&editor), Size::new(90.0, 90.0));
    view.activate_view(0).unwrap();

    let hit = view.cell_at_point(45.0, 75.0).unwrap();
    assert_eq!(hit.coordinate(), &Coordinate::xy(1, 2));
    assert!(view.cell_at_point(95.0, 5.0).is_none());
}

#[test]
fn test_render_emits_all_cells_in_order() {
    let editor = shared(editor_2d::<i32>(3, 2));
    let view = GridView::new(Rc::clone(&editor), Size::new(300.0, 200.0));
    view.activate_view(0).unwrap();
    view.set_cell_renderer(|cell| cell.label = Some(format!("{}", cell.index())));

    let mut backend = RecordingBackend::default();
    view.render(&mut backend).unwrap();
    assert_eq!(backend.frames, 1);
    assert!(backend.finished);
    assert_eq!(backend.size, Some(Size::new(300.0, 200.0)));
    let labels: Vec<_> = backend
        .cells
        .iter()
        .map(|c| c.label.clone().unwrap())
        .collect();
    assert_eq!(labels, vec!["0", "1", "2", "3", "4", "5"]);

    let mut svg = SvgBackend::new();
    view.render(&mut svg).unwrap();
    assert_eq!(svg.document().matches("<text").count(), 6);
}

#[test]
fn test_two_views_share_one_scale() {
    let editor = shared(editor_2d::<i32>(2, 2));
    let a = GridView::new(Rc::clone(&editor), Size::new(100.0, 100.0));
    let b = GridView::new(Rc::clone(&editor), Size::new(200.0, 200.0));
    a.activate_view(0).unwrap();
    assert_eq!(b.len(), 4);

    a.set_scale(0.5);
    assert_eq!(b.scale(), 0.5);
    assert_eq!(b.geometry().unwrap().cell_size, Size::new(50.0, 50.0));
}
