//! Bounded ordered lists
//!
//! `FieldList` keeps entries in insertion order and optionally caps its
//! length. Card contact fields use a cap of three; the watchlist is
//! uncapped. Appending to a full list is a silent no-op, while edits at a
//! stale index fail with [`Error::IndexOutOfRange`] and leave the list as
//! it was.

use serde::{Serialize, Serializer};

use crate::{Error, Result};

/// Ordered list with an optional maximum length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList<T> {
    items: Vec<T>,
    capacity: Option<usize>,
}

impl<T> FieldList<T> {
    /// Create an empty list holding at most `capacity` entries
    pub fn bounded(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Create an empty list with no length limit
    pub fn unbounded() -> Self {
        Self {
            items: Vec::new(),
            capacity: None,
        }
    }

    /// Build a bounded list from an iterator, keeping the first `capacity` items
    pub fn from_iter_bounded<I>(iter: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::bounded(capacity);
        for item in iter {
            if !list.push(item) {
                break;
            }
        }
        list
    }

    /// Append an entry.
    ///
    /// Returns `false` and leaves the list untouched when it is already full.
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Replace the entry at `index`, returning the previous value
    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, item))
    }

    /// Modify the entry at `index` in place
    pub fn update<F>(&mut self, index: usize, f: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        f(slot);
        Ok(())
    }

    /// Remove the entry at `index`, shifting later entries left
    pub fn remove(&mut self, index: usize) -> Result<T> {
        let len = self.items.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        Ok(self.items.remove(index))
    }

    /// Index of the first entry matching `pred`
    pub fn position<P>(&self, pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().position(pred)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// The primary (first) entry
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Whether another `push` would be rejected
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.items.len() >= cap)
    }

    /// Free slots left, `None` when unbounded
    pub fn remaining(&self) -> Option<usize> {
        self.capacity
            .map(|cap| cap.saturating_sub(self.items.len()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for FieldList<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<'a, T> IntoIterator for &'a FieldList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for FieldList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

// Serialized as a plain sequence; the capacity belongs to the owning type.
impl<T: Serialize> Serialize for FieldList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> FieldList<&'static str> {
        let mut list = FieldList::bounded(3);
        list.push("a");
        list.push("b");
        list.push("c");
        list
    }

    #[test]
    fn test_push_respects_capacity() {
        let mut list = abc();
        assert!(list.is_full());
        assert!(!list.push("d"));
        assert_eq!(list.as_slice(), &["a", "b", "c"]);
        assert_eq!(list.remaining(), Some(0));
    }

    #[test]
    fn test_unbounded_never_full() {
        let mut list = FieldList::unbounded();
        for i in 0..100 {
            assert!(list.push(i));
        }
        assert_eq!(list.len(), 100);
        assert!(!list.is_full());
        assert_eq!(list.remaining(), None);
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        for i in 0..3 {
            let mut list = abc();
            let removed = list.remove(i).unwrap();
            let expected: Vec<_> = ["a", "b", "c"]
                .into_iter()
                .filter(|s| *s != removed)
                .collect();
            assert_eq!(list.len(), 2);
            assert_eq!(list.as_slice(), expected.as_slice());
        }
    }

    #[test]
    fn test_out_of_range_leaves_list_unchanged() {
        let mut list = abc();

        let err = list.set(3, "x").unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 3 }));

        let err = list.update(7, |s| *s = "x").unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 7, len: 3 }));

        assert!(list.remove(3).is_err());
        assert_eq!(list, abc());
    }

    #[test]
    fn test_set_returns_previous() {
        let mut list = abc();
        assert_eq!(list.set(1, "B").unwrap(), "b");
        assert_eq!(list.as_slice(), &["a", "B", "c"]);
    }

    #[test]
    fn test_from_iter_bounded_truncates() {
        let list = FieldList::from_iter_bounded(1..=5, 3);
        assert_eq!(list.as_slice(), &[1, 2, 3]);
        assert_eq!(list.first(), Some(&1));
    }

    #[test]
    fn test_serializes_as_sequence() {
        let json = serde_json::to_string(&abc()).unwrap();
        assert_eq!(json, r#"["a","b","c"]"#);
    }
}
