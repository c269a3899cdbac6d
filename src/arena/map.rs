//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena;
use crate::arena::{
    iter::{Iter, Keys},
    ArenaKey,
};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ops::Index;
use std::{fmt, slice};

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// An append-only mapping of `K -> V`, effectively a `Vec<V>` that can only
/// be indexed with the key type it hands out.
///
/// There is deliberately no way to remove or overwrite an entry: a key that
/// has been handed out always refers to the same value for the lifetime of
/// the arena.
///
/// ```
/// # use castor::arena_key;
/// # use castor::arena::ArenaMap;
/// arena_key! {
///     struct Label;
/// }
///
/// let mut labels = ArenaMap::new();
/// let entry: Label = labels.insert("entry");
///
/// assert_eq!(labels[entry], "entry");
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct ArenaMap<K: ArenaKey, V> {
    slots: Vec<V>,
    #[cfg_attr(feature = "enable-serde", serde(skip))]
    _unused: PhantomData<fn() -> K>,
}

impl<K: ArenaKey, V> ArenaMap<K, V> {
    /// Creates a new, empty arena.
    #[inline]
    pub fn new() -> Self {
        Self {
            slots: Vec::default(),
            _unused: PhantomData,
        }
    }

    /// Checks whether `key` has been returned from [`Self::insert`] on this arena.
    ///
    /// ```
    /// # use castor::arena_key;
    /// # use castor::arena::*;
    /// # arena_key! { struct Key; }
    /// let mut map = ArenaMap::default();
    /// let mut other = ArenaMap::default();
    /// let k1: Key = map.insert(true);
    /// let _: Key = other.insert(false);
    /// let k2: Key = other.insert(false);
    /// assert!(map.contains(k1));
    /// assert!(!map.contains(k2));
    /// ```
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        key.key_index() < self.slots.len()
    }

    /// Gets the value for `key`, or `None` if the key was never handed out
    /// by this arena.
    #[inline]
    pub fn get(&self, key: K) -> Option<&V> {
        self.slots.get(key.key_index())
    }

    /// Adds a value to the arena and returns the key that refers to it.
    #[inline]
    pub fn insert(&mut self, value: V) -> K {
        self.slots.push(value);

        K::key_new(self.slots.len() - 1)
    }

    /// Gets the number of values in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Checks if nothing has been inserted into the arena.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over every valid key, in insertion order.
    pub fn keys(&self) -> Keys<K> {
        Keys::with_len(self.slots.len())
    }

    /// Iterates over every value, in insertion order.
    pub fn values(&self) -> slice::Iter<'_, V> {
        self.slots.iter()
    }

    /// Iterates over `(key, value)` pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + DoubleEndedIterator + ExactSizeIterator {
        Iter::with_inner(self.values())
    }
}

impl<K: ArenaKey, T> Default for ArenaMap<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> PartialEq for ArenaMap<K, V>
where
    K: ArenaKey,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl<K, V> Eq for ArenaMap<K, V>
where
    K: ArenaKey,
    V: Eq,
{
}

impl<K, V> Debug for ArenaMap<K, V>
where
    K: ArenaKey,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        arena::debug_write_map(f, "ArenaMap", self.iter())
    }
}

impl<K: ArenaKey, T> Index<K> for ArenaMap<K, T> {
    type Output = T;

    fn index(&self, key: K) -> &Self::Output {
        self.slots
            .get(key.key_index())
            .expect("tried to access invalid key on `ArenaMap`")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense_arena_key;

    dense_arena_key! { struct N; }

    #[test]
    #[should_panic(expected = "tried to access invalid key on `ArenaMap`")]
    fn key_from_other_arena() {
        // hide the stack trace, assuming this test panics as it's supposed to.
        std::panic::set_hook(Box::new(|_| {}));

        let mut m1 = ArenaMap::<N, &str>::new();
        let m2 = ArenaMap::<N, &str>::new();

        let k = m1.insert("x");

        let _ = m2[k];
    }

    #[test]
    fn insertion_order_is_key_order() {
        let mut m = ArenaMap::new();
        let a: N = m.insert("a");
        let b = m.insert("b");
        let c = m.insert("c");

        assert_eq!(m.keys().collect::<Vec<_>>(), [a, b, c]);
        assert_eq!(m.values().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(m.iter().rev().next(), Some((c, &"c")));
    }

    #[test]
    fn get_checks_the_key() {
        let mut m = ArenaMap::new();
        let k: N = m.insert(12);
        let foreign: N = ArenaMap::<N, i32>::new().insert(0);
        let beyond = ArenaMap::<N, i32>::new();

        assert!(m.contains(k));
        assert_eq!(m.get(k), Some(&12));
        assert!(beyond.get(foreign).is_none());
        assert!(!beyond.contains(foreign));
    }

    #[test]
    fn len_is_empty() {
        let mut m = ArenaMap::<N, i32>::new();

        assert_eq!(m.len(), 0);
        assert!(m.is_empty());

        m.insert(15);

        assert_eq!(m.len(), 1);
        assert!(!m.is_empty());
    }

    #[test]
    fn equality_is_order_sensitive() {
        let filled = |values: [i32; 2]| {
            let mut m = ArenaMap::<N, i32>::new();

            for v in values {
                m.insert(v);
            }

            m
        };

        let m1 = filled([1, 2]);
        let m2 = filled([2, 1]);
        let m3 = filled([1, 2]);

        assert_ne!(m1, m2);
        assert_eq!(m1, m3);
    }

    #[test]
    fn debug() {
        let mut m = ArenaMap::<N, i32>::new();

        m.insert(15);
        m.insert(20);

        assert_eq!(format!("{m:?}"), "ArenaMap {N(0): 15, N(1): 20}");
    }

    #[cfg(feature = "enable-serde")]
    #[test]
    fn serializes_only_the_slots() {
        let mut m = ArenaMap::<N, i32>::new();

        m.insert(3);
        m.insert(4);

        let json = serde_json::to_string(&m).unwrap();

        assert_eq!(json, r#"{"slots":[3,4]}"#);
        assert_eq!(serde_json::from_str::<ArenaMap<N, i32>>(&json).unwrap(), m);
    }
}
