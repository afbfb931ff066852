use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// A vector of `Value`s indexed by a typed id, so a [`DomainId`](crate::variables::DomainId) cannot
/// be used to look up a propagator by accident.
#[derive(Debug, Hash, PartialEq, Eq)]
pub struct KeyedVec<Key, Value> {
    key: PhantomData<Key>,
    elements: Vec<Value>,
}

impl<Key, Value: Clone> Clone for KeyedVec<Key, Value> {
    fn clone(&self) -> Self {
        Self {
            key: PhantomData,
            elements: self.elements.clone(),
        }
    }
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        Self {
            key: PhantomData,
            elements: Vec::default(),
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends `value`, returning its key.
    pub fn push(&mut self, value: Value) -> Key {
        self.elements.push(value);

        Key::create_from_index(self.elements.len() - 1)
    }

    pub fn get(&self, key: Key) -> Option<&Value> {
        self.elements.get(key.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &'_ Value> {
        self.elements.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> {
        (0..self.elements.len()).map(Key::create_from_index)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &'_ mut Value> {
        self.elements.iter_mut()
    }
}

impl<Key: StorageKey, Value: Clone> KeyedVec<Key, Value> {
    /// Grows the vector such that `key` becomes a valid index; new slots hold `default_value`.
    pub(crate) fn accommodate(&mut self, key: Key, default_value: Value) {
        if key.index() >= self.elements.len() {
            self.elements.resize(key.index() + 1, default_value)
        }
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, index: Key) -> &Self::Output {
        &self.elements[index.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, index: Key) -> &mut Self::Output {
        &mut self.elements[index.index()]
    }
}

impl StorageKey for usize {
    fn index(&self) -> usize {
        *self
    }

    fn create_from_index(index: usize) -> Self {
        index
    }
}

/// An id which maps one-to-one onto a position in a [`KeyedVec`].
pub trait StorageKey {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_values_are_indexed_by_returned_key() {
        let mut keyed_vec: KeyedVec<usize, &str> = KeyedVec::default();

        let first = keyed_vec.push("first");
        let second = keyed_vec.push("second");

        assert_eq!("first", keyed_vec[first]);
        assert_eq!("second", keyed_vec[second]);
        assert_eq!(vec![0, 1], keyed_vec.keys().collect::<Vec<_>>());
    }

    #[test]
    fn accommodate_grows_with_default_values() {
        let mut keyed_vec: KeyedVec<usize, bool> = KeyedVec::default();

        keyed_vec.accommodate(3, false);

        assert_eq!(4, keyed_vec.len());
        assert!(keyed_vec.iter().all(|value| !value));
    }
}
