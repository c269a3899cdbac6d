//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use std::fmt::Debug;

/// Models a type that can act as a key for an [`ArenaMap`](crate::arena::ArenaMap).
///
/// Prefer the [`arena_key`](crate::arena_key) or [`dense_arena_key`](crate::dense_arena_key)
/// macros over implementing this by hand.
pub trait ArenaKey: Copy + Eq + Debug {
    /// Creates a key from an arena index.
    ///
    /// Panics if `index` cannot be represented by the key's storage type, an
    /// overflowing key would silently alias an unrelated slot otherwise.
    fn key_new(index: usize) -> Self;

    /// Converts the key back into the arena index it was created from.
    fn key_index(self) -> usize;
}

/// Creates a type-safe key for an [`ArenaMap`](crate::arena::ArenaMap).
///
/// The storage type can be given explicitly, otherwise `usize` is used.
///
/// ```
/// # use castor::arena_key;
/// # use castor::arena::ArenaMap;
/// arena_key! {
///     /// Doc comments are carried over.
///     pub struct Stmt;
///
///     struct SmallRef(u8);
/// }
///
/// type Stmts = ArenaMap<Stmt, String>;
/// ```
#[macro_export(local_inner_macros)]
macro_rules! arena_key {
    ( $(#[$outer:meta])* $vis:vis struct $name:ident($ty:ty); $($rest:tt)* ) => {
        $(#[$outer])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "enable-serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name($ty);

        impl $crate::arena::ArenaKey for $name {
            #[inline]
            fn key_new(index: usize) -> Self {
                use std::convert::TryInto;

                Self(index.try_into().expect("index is not representable with key type"))
            }

            #[inline]
            fn key_index(self) -> usize {
                self.0 as usize
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
                std::write!(f, "{}({})", std::stringify!($name), self.0)
            }
        }

        arena_key!($($rest)*);
    };

    ( $(#[$outer:meta])* $vis:vis struct $name:ident; $($rest:tt)* ) => {
        arena_key! { $(#[$outer])* $vis struct $name(usize); $($rest)* }
    };

    () => {}
}

/// Same as [`arena_key`], but always backed by a [`u32`].
///
/// Function bodies never come close to `u32::MAX` nodes, so this halves the
/// size of every child list on 64-bit hosts.
///
/// ```
/// # use castor::dense_arena_key;
/// # use castor::arena::ArenaMap;
/// dense_arena_key! {
///     pub struct Leaf;
/// }
///
/// assert_eq!(std::mem::size_of::<Leaf>(), 4);
/// ```
#[macro_export(local_inner_macros)]
macro_rules! dense_arena_key {
    ( $(#[$outer:meta])* $vis:vis struct $name:ident; $($rest:tt)* ) => {
        arena_key! { $(#[$outer])* $vis struct $name(u32); }

        dense_arena_key!($($rest)*);
    };

    () => {}
}

#[cfg(test)]
mod tests {
    use crate::arena::*;
    use crate::{arena_key, dense_arena_key};
    use static_assertions::assert_eq_size;

    #[test]
    fn default_storage_is_usize() {
        arena_key! { struct Key; }

        assert_eq_size!(Key, usize);
    }

    #[test]
    fn dense_storage_is_u32() {
        dense_arena_key! { struct Key; }

        assert_eq_size!(Key, u32);
    }

    #[test]
    fn explicit_storage_is_respected() {
        arena_key! { struct Key(u16); }

        assert_eq_size!(Key, u16);
    }

    #[test]
    fn keys_round_trip_through_index() {
        dense_arena_key! { struct Key; }

        for i in [0usize, 1, 17, 4096] {
            assert_eq!(Key::key_new(i).key_index(), i);
        }
    }

    #[test]
    fn debug_uses_type_name() {
        dense_arena_key! { struct Leaf; }

        assert_eq!(format!("{:?}", Leaf::key_new(3)), "Leaf(3)");
    }

    #[test]
    #[should_panic(expected = "index is not representable with key type")]
    fn overflowing_key_panics() {
        // hide the stack trace, assuming this test panics as it's supposed to.
        std::panic::set_hook(Box::new(|_| {}));

        arena_key! { struct Key(u8); }

        let mut map = ArenaMap::new();

        // 1 past what u8 can represent
        for i in 0..=256 {
            let k: Key = map.insert(i);

            assert_eq!(map[k], i);
        }
    }
}
