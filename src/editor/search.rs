//! Predicate search over all records of an editor.
//!
//! The synchronous variants evaluate immediately. The `_async` variants
//! return a [`SearchTask`] future operating on a snapshot of the record set:
//! it evaluates [`SEARCH_BATCH`] records per poll and yields in between, so a
//! UI thread driving an executor stays responsive. Both variants match
//! identically and report records in creation order.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::{CellModel, GridEditor};
use crate::error::Result;
use crate::types::Coordinate;

/// Records evaluated per poll of a [`SearchTask`].
pub const SEARCH_BATCH: usize = 256;

type SearchPredicate<T> = Box<dyn FnMut(&CellModel<T>) -> Result<bool>>;

/// Deferred search. Resolves to the matching records, or to the first error a
/// predicate returns.
///
/// Nothing is evaluated until the task is polled. There is no cancellation;
/// dropping the task simply stops the search.
pub struct SearchTask<T> {
    pending: std::vec::IntoIter<CellModel<T>>,
    matches: Vec<CellModel<T>>,
    predicate: SearchPredicate<T>,
    finished: bool,
}

impl<T> SearchTask<T> {
    fn new(snapshot: Vec<CellModel<T>>, predicate: SearchPredicate<T>) -> Self {
        Self {
            pending: snapshot.into_iter(),
            matches: Vec::new(),
            predicate,
            finished: false,
        }
    }

    /// Records not yet evaluated.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    fn step(&mut self) -> Option<Result<Vec<CellModel<T>>>> {
        for _ in 0..SEARCH_BATCH {
            let Some(cell) = self.pending.next() else {
                self.finished = true;
                return Some(Ok(std::mem::take(&mut self.matches)));
            };
            match (self.predicate)(&cell) {
                Ok(true) => self.matches.push(cell),
                Ok(false) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

impl<T> Future for SearchTask<T> {
    type Output = Result<Vec<CellModel<T>>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(Ok(Vec::new()));
        }
        match this.step() {
            Some(result) => Poll::Ready(result),
            None => {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }
}

impl<T: 'static> GridEditor<T> {
    /// Records whose position satisfies `predicate`.
    pub fn find_by_position(
        &self,
        mut predicate: impl FnMut(&Coordinate) -> bool,
    ) -> Vec<CellModel<T>> {
        self.find_by_cell(|c| predicate(c.position()))
    }

    /// Records whose payload satisfies `predicate` (`None` for empty records).
    pub fn find_by_data(&self, mut predicate: impl FnMut(Option<&T>) -> bool) -> Vec<CellModel<T>> {
        self.find_by_cell(|c| c.with_data(&mut predicate))
    }

    /// Records carrying a payload equal to `value` under the editor's
    /// equality predicate.
    pub fn find_by_value(&self, value: &T) -> Vec<CellModel<T>> {
        self.find_by_cell(|c| c.data_equals(value))
    }

    /// Records satisfying `predicate`.
    pub fn find_by_cell(
        &self,
        mut predicate: impl FnMut(&CellModel<T>) -> bool,
    ) -> Vec<CellModel<T>> {
        self.cells.iter().filter(|c| predicate(c)).cloned().collect()
    }

    /// Records satisfying a fallible `predicate`.
    ///
    /// # Errors
    /// The first error returned by `predicate`; evaluation stops there.
    pub fn try_find_by_cell(
        &self,
        mut predicate: impl FnMut(&CellModel<T>) -> Result<bool>,
    ) -> Result<Vec<CellModel<T>>> {
        let mut found = Vec::new();
        for cell in &self.cells {
            if predicate(cell)? {
                found.push(cell.clone());
            }
        }
        Ok(found)
    }

    pub fn find_by_position_async(
        &self,
        mut predicate: impl FnMut(&Coordinate) -> bool + 'static,
    ) -> SearchTask<T> {
        self.try_find_by_cell_async(move |c| Ok(predicate(c.position())))
    }

    pub fn find_by_data_async(
        &self,
        mut predicate: impl FnMut(Option<&T>) -> bool + 'static,
    ) -> SearchTask<T> {
        self.try_find_by_cell_async(move |c| Ok(c.with_data(&mut predicate)))
    }

    pub fn find_by_cell_async(
        &self,
        mut predicate: impl FnMut(&CellModel<T>) -> bool + 'static,
    ) -> SearchTask<T> {
        self.try_find_by_cell_async(move |c| Ok(predicate(c)))
    }

    /// Deferred variant of [`GridEditor::try_find_by_cell`]. Predicate errors
    /// resolve the task with `Err`.
    pub fn try_find_by_cell_async(
        &self,
        predicate: impl FnMut(&CellModel<T>) -> Result<bool> + 'static,
    ) -> SearchTask<T> {
        tracing::debug!(records = self.cells.len(), "spawn search task");
        SearchTask::new(self.cells.clone(), Box::new(predicate))
    }
}
