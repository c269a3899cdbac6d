//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The AST that translated functions are lowered into.
//!
//! Every function gets its own [`Ast`], an append-only arena of nodes built
//! through an [`AstBuilder`]. Nodes refer to [`Operator`]s by `&'static`
//! reference, the operators themselves are a closed set of process-wide
//! constants shared by every function.

mod builder;
mod node;
mod operator;
mod position;
mod writer;

pub use builder::*;
pub use node::*;
pub use operator::*;
pub use position::*;
pub use writer::*;
