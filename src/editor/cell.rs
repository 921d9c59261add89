//! Cell records: one per coordinate, created lazily by the editor.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::observable::{ListenerId, Observable};
use crate::types::Coordinate;

/// Equality predicate for payload values.
pub type EqualFn<T> = Rc<dyn Fn(&T, &T) -> bool>;

struct CellInner<T> {
    position: Coordinate,
    data: Observable<Option<T>>,
    equal: EqualFn<T>,
}

/// Shared handle to the record of one coordinate.
///
/// Cloning the handle does not copy the record: all clones observe the same
/// payload. Use [`CellModel::ptr_eq`] to test record identity.
pub struct CellModel<T> {
    inner: Rc<CellInner<T>>,
}

impl<T> CellModel<T> {
    pub(crate) fn new(position: Coordinate, equal: EqualFn<T>) -> Self {
        Self {
            inner: Rc::new(CellInner {
                position,
                data: Observable::new(None),
                equal,
            }),
        }
    }

    pub fn position(&self) -> &Coordinate {
        &self.inner.position
    }

    /// Payload (cloned).
    pub fn data(&self) -> Option<T>
    where
        T: Clone,
    {
        self.inner.data.get()
    }

    /// Borrow the payload for the duration of `f`.
    pub fn with_data<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        self.inner.data.with(|d| f(d.as_ref()))
    }

    pub fn has_data(&self) -> bool {
        self.with_data(|d| d.is_some())
    }

    /// Replace the payload and return the previous one.
    ///
    /// Notifies this record's listeners only; the owning editor's layout
    /// listeners are not involved.
    pub fn set_data(&self, data: Option<T>) -> Option<T>
    where
        T: Clone,
    {
        self.inner.data.set(data)
    }

    pub fn clear_data(&self) -> Option<T>
    where
        T: Clone,
    {
        self.set_data(None)
    }

    /// True if the payload equals `value` under this record's equality predicate.
    pub fn data_equals(&self, value: &T) -> bool {
        self.with_data(|d| d.is_some_and(|d| (self.inner.equal)(d, value)))
    }

    /// True if both records carry equal payloads (or both carry none).
    pub fn same_data(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.with_data(|a| {
            other.with_data(|b| match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => (self.inner.equal)(a, b),
                _ => false,
            })
        })
    }

    /// True if both handles refer to the same record.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Listen to payload changes, receiving `(old, new)`.
    ///
    /// A listener may write this record again, for example to normalize the
    /// value; the nested write notifies all listeners before returning.
    pub fn subscribe(&self, listener: impl Fn(&Option<T>, &Option<T>) + 'static) -> ListenerId {
        self.inner.data.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.data.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.data.listener_count()
    }
}

impl<T> Clone for CellModel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Records are equal when they share a position and their payloads are equal
/// under the equality predicate.
impl<T> PartialEq for CellModel<T> {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position() && self.same_data(other)
    }
}

impl<T> Hash for CellModel<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position().hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for CellModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellModel")
            .field("position", self.position())
            .field("data", &self.inner.data)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn structural<T: PartialEq + 'static>() -> EqualFn<T> {
        Rc::new(|a: &T, b: &T| a == b)
    }

    #[test]
    fn test_clone_shares_record() {
        let a = CellModel::new(Coordinate::xy(1, 1), structural::<String>());
        let b = a.clone();
        a.set_data(Some("x".to_string()));
        assert_eq!(b.data().as_deref(), Some("x"));
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_set_data_notifies_old_and_new() {
        let cell = CellModel::new(Coordinate::xy(0, 0), structural::<i32>());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        cell.subscribe(move |old, new| s.borrow_mut().push((*old, *new)));

        assert_eq!(cell.set_data(Some(1)), None);
        assert_eq!(cell.set_data(Some(2)), Some(1));
        assert_eq!(cell.clear_data(), Some(2));
        assert_eq!(
            *seen.borrow(),
            vec![(None, Some(1)), (Some(1), Some(2)), (Some(2), None)]
        );
    }

    #[test]
    fn test_custom_equality_policy() {
        let case_insensitive: EqualFn<String> =
            Rc::new(|a: &String, b: &String| a.eq_ignore_ascii_case(b));
        let a = CellModel::new(Coordinate::xy(0, 0), Rc::clone(&case_insensitive));
        let b = CellModel::new(Coordinate::xy(0, 0), case_insensitive);
        a.set_data(Some("Hello".into()));
        b.set_data(Some("HELLO".into()));

        assert!(a.same_data(&b));
        assert!(a == b);
        assert!(a.data_equals(&"hello".to_string()));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_equality_requires_same_position() {
        let a = CellModel::new(Coordinate::xy(0, 0), structural::<i32>());
        let b = CellModel::new(Coordinate::xy(0, 1), structural::<i32>());
        assert!(a.same_data(&b));
        assert!(a != b);
    }
}
