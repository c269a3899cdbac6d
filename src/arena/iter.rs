//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::ArenaKey;
use std::iter::{Enumerate, FusedIterator};
use std::marker::PhantomData;

/// Pairs each value of an arena with the key it was stored under.
#[derive(Debug)]
pub(crate) struct Iter<'a, Inner, K, V>
where
    Inner: Iterator<Item = &'a V>,
    K: ArenaKey,
    V: 'a,
{
    inner: Enumerate<Inner>,
    _unused: PhantomData<fn() -> K>,
}

impl<'a, Inner, K, V> Iter<'a, Inner, K, V>
where
    Inner: Iterator<Item = &'a V>,
    K: ArenaKey,
    V: 'a,
{
    pub(crate) fn with_inner(inner: Inner) -> Self {
        Self {
            inner: inner.enumerate(),
            _unused: PhantomData,
        }
    }
}

impl<'a, Inner, K, V> Iterator for Iter<'a, Inner, K, V>
where
    Inner: Iterator<Item = &'a V>,
    K: ArenaKey,
    V: 'a,
{
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(i, val)| (K::key_new(i), val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, Inner, K, V> DoubleEndedIterator for Iter<'a, Inner, K, V>
where
    Inner: Iterator<Item = &'a V> + DoubleEndedIterator + ExactSizeIterator,
    K: ArenaKey,
    V: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(i, val)| (K::key_new(i), val))
    }
}

impl<'a, Inner, K, V> ExactSizeIterator for Iter<'a, Inner, K, V>
where
    Inner: Iterator<Item = &'a V> + ExactSizeIterator,
    K: ArenaKey,
    V: 'a,
{
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<'a, Inner, K, V> FusedIterator for Iter<'a, Inner, K, V>
where
    Inner: Iterator<Item = &'a V> + FusedIterator,
    K: ArenaKey,
    V: 'a,
{
}

/// Iterates over all of the keys in an [`ArenaMap`](crate::arena::ArenaMap),
/// from the first inserted to the last.
///
/// ```
/// # use castor::arena_key;
/// # use castor::arena::*;
/// arena_key! { struct K; }
/// let mut map = ArenaMap::<K, i32>::new();
/// let k1 = map.insert(1);
/// let k2 = map.insert(2);
/// let mut keys = map.keys();
/// assert_eq!(keys.next(), Some(k1));
/// assert_eq!(keys.next_back(), Some(k2));
/// assert_eq!(keys.next(), None);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Keys<K: ArenaKey> {
    pos: usize,
    reverse_pos: usize,
    _unused: PhantomData<fn() -> K>,
}

impl<K: ArenaKey> Keys<K> {
    pub(super) fn with_len(len: usize) -> Self {
        Self {
            pos: 0,
            reverse_pos: len,
            _unused: PhantomData,
        }
    }
}

impl<K: ArenaKey> Iterator for Keys<K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos < self.reverse_pos {
            self.pos += 1;

            Some(K::key_new(self.pos - 1))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.reverse_pos - self.pos;

        (size, Some(size))
    }
}

impl<K: ArenaKey> DoubleEndedIterator for Keys<K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.pos < self.reverse_pos {
            self.reverse_pos -= 1;

            Some(K::key_new(self.reverse_pos))
        } else {
            None
        }
    }
}

impl<K: ArenaKey> ExactSizeIterator for Keys<K> {}

impl<K: ArenaKey> FusedIterator for Keys<K> {}
