//! Predicate lookup, synchronous and deferred.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use common::editor_2d;
use futures::executor::block_on;
use futures::task::noop_waker;
use gridslice::editor::SEARCH_BATCH;
use gridslice::{Coordinate, GridEditor, GridError};

fn populated() -> GridEditor<i32> {
    let mut editor = editor_2d(10, 10);
    editor.activate_view(0).unwrap();
    for x in 0..10 {
        editor
            .set_data(Coordinate::xy(x, x), Some(i32::try_from(x).unwrap()))
            .unwrap();
    }
    editor
}

#[test]
fn test_sync_lookups() {
    let editor = populated();

    let diagonal = editor.find_by_position(|c| c.get(0) == c.get(1));
    assert_eq!(diagonal.len(), 10);

    let even = editor.find_by_data(|d| d.is_some_and(|v| v % 2 == 0));
    assert_eq!(even.len(), 5);

    let empty = editor.find_by_data(|d| d.is_none());
    assert_eq!(empty.len(), 90);

    let sevens = editor.find_by_value(&7);
    assert_eq!(sevens.len(), 1);
    assert_eq!(sevens[0].position(), &Coordinate::xy(7, 7));

    let first_row = editor.find_by_cell(|c| c.position().get(1) == Some(0));
    assert_eq!(first_row.len(), 10);
}

#[test]
fn test_results_in_creation_order() {
    let mut editor: GridEditor<i32> = editor_2d(3, 3);
    editor.set_data(Coordinate::xy(2, 2), Some(1)).unwrap();
    editor.activate_view(0).unwrap();

    let all = editor.find_by_cell(|_| true);
    assert_eq!(all[0].position(), &Coordinate::xy(2, 2));
    assert_eq!(all[1].position(), &Coordinate::xy(0, 0));
    assert_eq!(all.len(), 9);
}

#[test]
fn test_fallible_search_stops_at_first_error() {
    let editor = populated();
    let mut seen = 0;
    let result = editor.try_find_by_cell(|c| {
        seen += 1;
        if c.position() == &Coordinate::xy(4, 0) {
            Err(GridError::Search("boom".into()))
        } else {
            Ok(true)
        }
    });
    assert!(matches!(result, Err(GridError::Search(m)) if m == "boom"));
    assert_eq!(seen, 5);
}

#[test]
fn test_async_matches_sync() {
    let editor = populated();
    let sync = editor.find_by_data(|d| d.is_some_and(|v| *v > 3));
    let deferred = block_on(editor.find_by_data_async(|d| d.is_some_and(|v| *v > 3))).unwrap();

    assert_eq!(sync.len(), deferred.len());
    assert!(sync.iter().zip(&deferred).all(|(a, b)| a.ptr_eq(b)));

    let by_position =
        block_on(editor.find_by_position_async(|c| c.get(0) == Some(9))).unwrap();
    assert_eq!(by_position.len(), 10);

    let by_cell = block_on(editor.find_by_cell_async(|c| c.has_data())).unwrap();
    assert_eq!(by_cell.len(), 10);
}

#[test]
fn test_async_error_resolves_future() {
    let editor = populated();
    let task = editor.try_find_by_cell_async(|c| {
        if c.has_data() {
            Err(GridError::Search(format!("hit {}", c.position())))
        } else {
            Ok(false)
        }
    });
    match block_on(task) {
        Err(GridError::Search(m)) => assert_eq!(m, "hit (0, 0)"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_async_yields_between_batches() {
    let mut editor: GridEditor<i32> = editor_2d(32, 32);
    editor.activate_view(0).unwrap();
    assert!(editor.len() > SEARCH_BATCH * 2);

    let mut task = editor.find_by_cell_async(|_| true);
    assert_eq!(task.remaining(), 1024);

    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    let mut polls = 0;
    let found = loop {
        polls += 1;
        match Pin::new(&mut task).poll(&mut cx) {
            Poll::Ready(result) => break result.unwrap(),
            Poll::Pending => assert!(task.remaining() < 1024),
        }
    };
    assert_eq!(found.len(), 1024);
    assert!(polls > 1024 / SEARCH_BATCH);
}

#[test]
fn test_async_runs_on_snapshot() {
    let mut editor: GridEditor<i32> = editor_2d(2, 2);
    editor.activate_view(0).unwrap();
    let task = editor.find_by_cell_async(|_| true);

    // Records created after the task was spawned are not part of it
    editor.set_data(Coordinate::xy(8, 8), Some(1)).unwrap();
    assert_eq!(block_on(task).unwrap().len(), 4);
}
