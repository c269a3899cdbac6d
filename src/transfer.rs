//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The plain-data shape that functions cross the front-end boundary in.
//!
//! Nothing in here is validated, these are just owned copies of what the
//! front-end handed over. [`crate::lower`] is what turns them into an
//! [`EntityInfo`](crate::entity::EntityInfo), and it is the part that checks
//! that they actually make sense.
//!
//! Every [`RawEntityInfo`] carries a `version`, anything other than
//! [`TRANSFER_VERSION`] is refused rather than guessed at.

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// The version of the transfer shape that this crate understands.
pub const TRANSFER_VERSION: u32 = 1;

/// A source span as the front-end reports it, 1-based and inclusive.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct RawPosition {
    /// The file the span is in
    pub file: String,
    /// Line the span starts on
    pub first_line: u32,
    /// Column the span starts on
    pub first_col: u32,
    /// Line the span ends on
    pub last_line: u32,
    /// Column the span ends on
    pub last_col: u32,
}

impl RawPosition {
    /// Creates a span.
    pub fn new(file: &str, first_line: u32, first_col: u32, last_line: u32, last_col: u32) -> Self {
        Self {
            file: file.to_owned(),
            first_line,
            first_col,
            last_line,
            last_col,
        }
    }
}

/// One operand of a [`RawInstruction`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "enable-serde", serde(rename_all = "snake_case"))]
pub enum RawOperand {
    /// A named value, either a parameter or the result of another instruction
    Var(String),
    /// An integer literal
    Int(i64),
    /// A floating-point literal
    Float(f64),
    /// A boolean literal
    Bool(bool),
    /// A string literal
    Str(String),
    /// The null literal
    Null,
}

/// A single instruction inside of a [`RawBlock`].
///
/// `targets` holds the labels of any blocks that the instruction can branch to,
/// it is empty for everything except branches.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct RawInstruction {
    /// The instruction's mnemonic
    pub opcode: String,
    /// The name the result is bound to, if it has one
    #[cfg_attr(feature = "enable-serde", serde(default))]
    pub result: Option<String>,
    /// The operands, in order
    #[cfg_attr(feature = "enable-serde", serde(default))]
    pub operands: Vec<RawOperand>,
    /// Branch targets, in order
    #[cfg_attr(feature = "enable-serde", serde(default))]
    pub targets: Vec<String>,
    /// Where the instruction came from
    #[cfg_attr(feature = "enable-serde", serde(default))]
    pub position: Option<RawPosition>,
}

impl RawInstruction {
    /// Creates an instruction with no result, targets or position.
    pub fn new(opcode: &str, operands: Vec<RawOperand>) -> Self {
        Self {
            opcode: opcode.to_owned(),
            result: None,
            operands,
            targets: Vec::default(),
            position: None,
        }
    }

    /// Binds the instruction's result to `name`.
    pub fn with_result(self, name: &str) -> Self {
        Self {
            result: Some(name.to_owned()),
            ..self
        }
    }

    /// Gives the instruction branch targets.
    pub fn with_targets(self, targets: &[&str]) -> Self {
        Self {
            targets: targets.iter().map(|s| s.to_string()).collect(),
            ..self
        }
    }

    /// Gives the instruction a position.
    pub fn at(self, position: RawPosition) -> Self {
        Self {
            position: Some(position),
            ..self
        }
    }
}

/// A labeled basic block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct RawBlock {
    /// The block's label, which branches refer to it by
    pub label: String,
    /// The instructions, in execution order
    pub instructions: Vec<RawInstruction>,
}

/// A whole function as the front-end hands it over.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct RawEntityInfo {
    /// Version of the transfer shape, see [`TRANSFER_VERSION`]
    pub version: u32,
    /// The function's name
    pub function_name: String,
    /// The declared return type
    pub return_type: String,
    /// Parameter names in declaration order
    #[cfg_attr(feature = "enable-serde", serde(default))]
    pub argument_names: Vec<String>,
    /// Parameter types, parallel to `argument_names`
    #[cfg_attr(feature = "enable-serde", serde(default))]
    pub argument_types: Vec<String>,
    /// Parameter spans, parallel to `argument_names`
    #[cfg_attr(feature = "enable-serde", serde(default))]
    pub argument_positions: Vec<RawPosition>,
    /// Span of the whole declaration
    #[cfg_attr(feature = "enable-serde", serde(default))]
    pub function_position: Option<RawPosition>,
    /// The body, entry block first. Empty for a declaration.
    #[cfg_attr(feature = "enable-serde", serde(default))]
    pub blocks: Vec<RawBlock>,
}

impl RawEntityInfo {
    /// Creates an empty function at the current transfer version.
    pub fn new(function_name: &str, return_type: &str) -> Self {
        Self {
            version: TRANSFER_VERSION,
            function_name: function_name.to_owned(),
            return_type: return_type.to_owned(),
            argument_names: Vec::default(),
            argument_types: Vec::default(),
            argument_positions: Vec::default(),
            function_position: None,
            blocks: Vec::default(),
        }
    }
}
