//! Render-order walk over a 2D view.

use super::IterationOrder;

/// `0..extent`, optionally walked from `extent - 1` down to `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    extent: u32,
    reversed: bool,
    next: u32,
}

impl AxisRange {
    pub fn new(extent: u32, reversed: bool) -> Self {
        Self {
            extent,
            reversed,
            next: 0,
        }
    }

    pub fn extent(&self) -> u32 {
        self.extent
    }

    /// Value at position `n` of the walk, independent of iteration state.
    pub fn nth_value(&self, n: u32) -> Option<u32> {
        if n >= self.extent {
            return None;
        }
        Some(if self.reversed {
            self.extent - 1 - n
        } else {
            n
        })
    }

    fn restart(&mut self) {
        self.next = 0;
    }
}

impl Iterator for AxisRange {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let value = self.nth_value(self.next)?;
        self.next += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.extent.saturating_sub(self.next)).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}

/// Iterator of `(column, row)` pairs in render order.
#[derive(Debug, Clone)]
pub struct Traversal {
    outer: AxisRange,
    inner: AxisRange,
    current_outer: Option<u32>,
    order: IterationOrder,
}

impl Traversal {
    pub(crate) fn new(columns: AxisRange, rows: AxisRange, order: IterationOrder) -> Self {
        let (mut outer, inner) = match order {
            IterationOrder::RowMajor => (rows, columns),
            IterationOrder::ColumnMajor => (columns, rows),
        };
        // An empty inner axis makes the whole walk empty.
        let current_outer = if inner.extent() == 0 {
            None
        } else {
            outer.next()
        };
        Self {
            outer,
            inner,
            current_outer,
            order,
        }
    }

    /// Number of steps in a full walk.
    pub fn total(&self) -> usize {
        let o = usize::try_from(self.outer.extent()).unwrap_or(usize::MAX);
        let i = usize::try_from(self.inner.extent()).unwrap_or(usize::MAX);
        o.saturating_mul(i)
    }
}

impl Iterator for Traversal {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        loop {
            let outer = self.current_outer?;
            if let Some(inner) = self.inner.next() {
                return Some(match self.order {
                    IterationOrder::RowMajor => (inner, outer),
                    IterationOrder::ColumnMajor => (outer, inner),
                });
            }
            self.current_outer = self.outer.next();
            self.inner.restart();
        }
    }
}
