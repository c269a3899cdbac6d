//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

#![deny(
    unreachable_pub,
    missing_docs,
    missing_abi,
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links
)]

//! # Castor
//!
//! Normalizes the per-function IR that a front-end hands over into an AST
//! that static analyses can consume.
//!
//! A front-end describes each function as a [`RawEntityInfo`](transfer::RawEntityInfo),
//! which [`translate`] lowers into an [`EntityInfo`](entity::EntityInfo): the
//! function's basic blocks as AST subtrees, its signature, and the source
//! positions of all of it. Operations in the IR are resolved against a fixed
//! registry of [`Operator`](ast::Operator)s, and anything the registry does not
//! know about falls back to [`BINARY_ARBITRARY`](ast::BINARY_ARBITRARY) or
//! [`UNARY_ARBITRARY`](ast::UNARY_ARBITRARY) rather than being dropped.

pub mod arena;
pub mod ast;
pub mod entity;
pub mod lower;
pub mod transfer;
pub mod translate;
pub mod utility;

#[cfg(feature = "dev-tools")]
pub mod cli;

pub use translate::{translate, translate_function, translate_unit};
