//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! A small typed arena, used to store AST nodes.
//!
//! Nodes are never deleted from an arena, a function's AST is built once by the
//! lowering step and then handed off whole. Keys are plain indices wrapped in a
//! type that only indexes the arena it is meant for.
//!
//! ```
//! # use castor::dense_arena_key;
//! # use castor::arena::*;
//! dense_arena_key! {
//!     pub struct Expr;
//! }
//!
//! enum Tree {
//!     Leaf(i64),
//!     Add(Expr, Expr),
//! }
//!
//! let mut arena = ArenaMap::new();
//!
//! // 1 + 2
//! let lhs: Expr = arena.insert(Tree::Leaf(1));
//! let rhs = arena.insert(Tree::Leaf(2));
//! let sum = arena.insert(Tree::Add(lhs, rhs));
//!
//! assert!(matches!(arena[sum], Tree::Add(_, _)));
//! ```

mod iter;
mod key;
mod map;

pub use iter::*;
pub use key::ArenaKey;
pub use map::ArenaMap;

use std::fmt;
use std::fmt::{Debug, Formatter};

pub(in crate::arena) fn debug_write_map<'a, K, V>(
    f: &mut Formatter<'_>,
    name: &'static str,
    it: impl Iterator<Item = (K, &'a V)>,
) -> fmt::Result
where
    K: ArenaKey,
    V: Debug + 'a,
{
    write!(f, "{name} ")?;

    f.debug_map().entries(it).finish()
}
