//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Lowers the plain-data transfer shape into an AST.
//!
//! Each [`RawBlock`] becomes a `BLOCK_STMT` whose first statement is the
//! block's `LABEL`, followed by one statement per instruction (two for a
//! conditional branch, which becomes an `IF_GOTO` and a `GOTO`).
//!
//! Opcodes are resolved against the operator registry by their mnemonic and
//! operand count. An opcode that is not recognized, or a recognized one used
//! with the wrong number of operands, is never an error: with two operands it
//! becomes a `BINARY_EXPR` over [`BINARY_ARBITRARY`](crate::ast::BINARY_ARBITRARY),
//! with one a `UNARY_EXPR` over [`UNARY_ARBITRARY`](crate::ast::UNARY_ARBITRARY),
//! and with any other count a `PRIMITIVE` that keeps the opcode's name. The
//! operands are never dropped. Only the control-flow opcodes (`assign`, `call`,
//! `return`, `br` and `cond_br`) can be malformed.

use crate::ast::{Arity, AstBuilder, Constant, Node, Operator, Position};
use crate::entity::{EntityError, EntityParts};
use crate::transfer::{
    RawBlock, RawEntityInfo, RawInstruction, RawOperand, RawPosition, TRANSFER_VERSION,
};
use crate::utility::SaHashSet;
use thiserror::Error;

/// Ways that turning a [`RawEntityInfo`] into an entity can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// The transfer shape is from a version this crate does not understand.
    #[error("unsupported transfer version {found} (expected {})", TRANSFER_VERSION)]
    UnsupportedVersion {
        /// The version that was given
        found: u32,
    },

    /// Two blocks in the same function share a label.
    #[error("block label `{0}` is used more than once")]
    DuplicateLabel(String),

    /// A recognized instruction does not have the shape its opcode requires.
    #[error("malformed `{opcode}` (instruction {index} of block `{block}`): {reason}")]
    MalformedInstruction {
        /// The label of the block the instruction is in
        block: String,
        /// The index of the instruction inside of the block
        index: usize,
        /// The instruction's opcode
        opcode: String,
        /// What is wrong with it
        reason: String,
    },

    /// A span is empty, backwards or uses 0 for a line or column.
    #[error(
        "invalid source span {}:{}:{}-{}:{}",
        .0.file, .0.first_line, .0.first_col, .0.last_line, .0.last_col
    )]
    InvalidPosition(RawPosition),

    /// The lowered pieces do not form a valid entity.
    #[error(transparent)]
    Entity(#[from] EntityError),
}

/// Lowers `raw` into the pieces of an entity, without validating them as one.
///
/// All of `raw` is copied, nothing in the result borrows from it.
pub fn lower(raw: &RawEntityInfo) -> Result<EntityParts, TranslateError> {
    if raw.version != TRANSFER_VERSION {
        return Err(TranslateError::UnsupportedVersion { found: raw.version });
    }

    let mut lowerer = FunctionLowerer::new(raw)?;

    let function_position = match &raw.function_position {
        Some(pos) => Some(lowerer.position(pos)?),
        None => None,
    };

    let argument_positions = raw
        .argument_positions
        .iter()
        .map(|pos| lowerer.position(pos))
        .collect::<Result<Vec<_>, _>>()?;

    let basic_blocks = raw
        .blocks
        .iter()
        .map(|bb| lowerer.block(bb))
        .collect::<Result<Vec<_>, _>>()?;

    let (ast, positions) = lowerer.builder.finish();

    Ok(EntityParts {
        function_name: raw.function_name.clone(),
        ast,
        basic_blocks,
        return_type: raw.return_type.clone(),
        argument_types: raw.argument_types.clone(),
        argument_names: raw.argument_names.clone(),
        positions,
        function_position,
        argument_positions,
    })
}

struct FunctionLowerer<'r> {
    function: &'r str,
    labels: SaHashSet<&'r str>,
    builder: AstBuilder,
}

impl<'r> FunctionLowerer<'r> {
    fn new(raw: &'r RawEntityInfo) -> Result<Self, TranslateError> {
        let mut labels = SaHashSet::default();

        for bb in raw.blocks.iter() {
            if !labels.insert(bb.label.as_str()) {
                return Err(TranslateError::DuplicateLabel(bb.label.clone()));
            }
        }

        Ok(Self {
            function: &raw.function_name,
            labels,
            builder: AstBuilder::new(),
        })
    }

    fn position(&mut self, raw: &RawPosition) -> Result<Position, TranslateError> {
        self.builder
            .position(
                &raw.file,
                raw.first_line,
                raw.first_col,
                raw.last_line,
                raw.last_col,
            )
            .ok_or_else(|| TranslateError::InvalidPosition(raw.clone()))
    }

    fn block(&mut self, bb: &RawBlock) -> Result<Node, TranslateError> {
        let mut stmts = Vec::with_capacity(bb.instructions.len() + 1);

        stmts.push(self.builder.label(&bb.label));

        for (index, inst) in bb.instructions.iter().enumerate() {
            let pos = match &inst.position {
                Some(pos) => Some(self.position(pos)?),
                None => None,
            };

            self.builder.at(pos);

            let lowered = self.instruction(inst, &mut stmts);

            self.builder.at(None);

            lowered.map_err(|reason| TranslateError::MalformedInstruction {
                block: bb.label.clone(),
                index,
                opcode: inst.opcode.clone(),
                reason,
            })?;
        }

        Ok(self.builder.block(&stmts))
    }

    fn instruction(&mut self, inst: &RawInstruction, stmts: &mut Vec<Node>) -> Result<(), String> {
        let is_branch = matches!(inst.opcode.as_str(), "br" | "cond_br");

        if !is_branch && !inst.targets.is_empty() {
            return Err("only branches can have targets".into());
        }

        let operands = inst
            .operands
            .iter()
            .map(|op| self.operand(op))
            .collect::<Vec<_>>();

        let expr = match inst.opcode.as_str() {
            "assign" => {
                expect_operands(&operands, 1)?;

                let name = inst.result.as_deref().ok_or("nothing to assign to")?;
                let lhs = self.builder.var(name);

                stmts.push(self.builder.assign(lhs, operands[0]));

                return Ok(());
            }
            "return" => {
                expect_no_result(inst)?;

                if operands.len() > 1 {
                    return Err(format!("expected at most 1 operand, found {}", operands.len()));
                }

                stmts.push(self.builder.ret(operands.first().copied()));

                return Ok(());
            }
            "br" => {
                expect_no_result(inst)?;
                expect_operands(&operands, 0)?;

                let [target] = self.targets::<1>(inst)?;

                stmts.push(self.builder.goto(target));

                return Ok(());
            }
            "cond_br" => {
                expect_no_result(inst)?;
                expect_operands(&operands, 1)?;

                let [then, otherwise] = self.targets::<2>(inst)?;

                stmts.push(self.builder.if_goto(operands[0], then));
                stmts.push(self.builder.goto(otherwise));

                return Ok(());
            }
            "call" => match operands.split_first() {
                Some((target, args)) => self.builder.call(*target, args),
                None => return Err("a call needs a target".into()),
            },
            opcode => self.operation(opcode, &operands),
        };

        let stmt = match &inst.result {
            Some(name) => {
                let lhs = self.builder.var(name);

                self.builder.assign(lhs, expr)
            }
            None => expr,
        };

        stmts.push(stmt);

        Ok(())
    }

    fn operation(&mut self, opcode: &str, operands: &[Node]) -> Node {
        if let Some(arity) = Arity::from_operand_count(operands.len()) {
            let op = Operator::resolve(opcode, arity);

            if op.is_fallback() {
                tracing::debug!(
                    function = self.function,
                    opcode,
                    operator = op.tag(),
                    "no precise operator for opcode, using fallback"
                );
            }

            // `resolve` only hands back operators of the requested arity
            if let Some(expr) = self.builder.expr(op, operands) {
                return expr;
            }
        }

        tracing::debug!(
            function = self.function,
            opcode,
            operands = operands.len(),
            "no operator takes this many operands, lowering as primitive"
        );

        self.builder.primitive(opcode, operands)
    }

    fn operand(&mut self, op: &RawOperand) -> Node {
        match op {
            RawOperand::Var(name) => self.builder.var(name),
            RawOperand::Int(i) => self.builder.int(*i),
            RawOperand::Float(f) => self.builder.constant(Constant::float(*f)),
            RawOperand::Bool(b) => self.builder.constant(Constant::Bool(*b)),
            RawOperand::Str(s) => self.builder.string(s),
            RawOperand::Null => self.builder.constant(Constant::Null),
        }
    }

    fn targets<'i, const N: usize>(&self, inst: &'i RawInstruction) -> Result<[&'i str; N], String> {
        let targets = inst
            .targets
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>();

        let targets: [&str; N] = targets
            .try_into()
            .map_err(|t: Vec<&str>| format!("expected {N} branch targets, found {}", t.len()))?;

        match targets.iter().find(|t| !self.labels.contains(**t)) {
            Some(unknown) => Err(format!("unknown branch target `{unknown}`")),
            None => Ok(targets),
        }
    }
}

fn expect_operands(operands: &[Node], count: usize) -> Result<(), String> {
    if operands.len() == count {
        Ok(())
    } else {
        Err(format!("expected {count} operands, found {}", operands.len()))
    }
}

fn expect_no_result(inst: &RawInstruction) -> Result<(), String> {
    match inst.result {
        Some(_) => Err("does not produce a value".into()),
        None => Ok(()),
    }
}
