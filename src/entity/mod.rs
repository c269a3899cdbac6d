//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Per-function entity descriptors, and the seam they are handed across.
//!
//! An [`EntityInfo`] bundles everything needed to build one analyzable function:
//! its basic blocks, its signature, and where it all came from in the source.
//! It is built once, validated once, and then moved into an [`EntityConsumer`].

mod consumer;
mod info;

pub use consumer::*;
pub use info::*;

use thiserror::Error;

/// Ways that building or registering an entity can fail.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum EntityError {
    /// Every entity is looked up by name, an unnamed one can never be found.
    #[error("function name must not be empty")]
    EmptyName,

    /// The parallel parameter sequences do not line up. Truncating would attach
    /// a type or a position to the wrong parameter, so the entity is rejected.
    #[error(
        "parameters of `{function}` do not line up: {names} names, {types} types, {positions} positions"
    )]
    ArityMismatch {
        /// The function being built
        function: String,
        /// Length of the argument names
        names: usize,
        /// Length of the argument types
        types: usize,
        /// Length of the argument positions
        positions: usize,
    },

    /// A basic block root is not a node of the entity's AST.
    #[error("block {index} of `{function}` is not a node of its AST")]
    DanglingBlock {
        /// The function being built
        function: String,
        /// Index of the block inside of the block list
        index: usize,
    },

    /// A position refers to a node or a file name that the entity's AST does not have.
    #[error("a source position of `{function}` does not belong to its AST")]
    DanglingPosition {
        /// The function being built
        function: String,
    },

    /// A consumer already holds an entity with this name.
    #[error("an entity named `{0}` was already registered")]
    DuplicateName(String),
}
