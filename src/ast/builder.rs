//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ast::*;
use crate::utility::Str;
use paste::paste;
use smallvec::SmallVec;

/// Builds the subtrees of a single function.
///
/// The builder owns both the [`Ast`] being grown and the [`SourcePositionRecorder`]
/// that goes with it. Setting a position with [`Self::at`] records it for every
/// non-leaf node built until the position is changed again, so lowering an
/// instruction only has to set its position once.
///
/// Call targets are indexed as `CALL` nodes are built, see [`Ast::call_sites`].
///
/// ```
/// # use castor::ast::*;
/// let mut b = AstBuilder::new();
/// let x = b.var("x");
/// let y = b.var("y");
/// let sum = b.add(x, y);
/// let (ast, _) = b.finish();
///
/// assert_eq!(ast.expr_operator(sum), Some(&ADD));
/// ```
#[derive(Debug, Default)]
pub struct AstBuilder {
    ast: Ast,
    positions: SourcePositionRecorder,
    current: Option<Position>,
}

macro_rules! binary_builder {
    ($name:ident, $op:ident, $tag:literal) => {
        paste! {
            #[doc = concat!("Builds `BINARY_EXPR[OP:", $tag, ", lhs, rhs]`.")]
            pub fn [< $name >](&mut self, lhs: Node, rhs: Node) -> Node {
                self.binary_expr(&$op, lhs, rhs)
            }
        }
    };
}

macro_rules! unary_builder {
    ($name:ident, $op:ident, $tag:literal) => {
        paste! {
            #[doc = concat!("Builds `UNARY_EXPR[OP:", $tag, ", operand]`.")]
            pub fn [< $name >](&mut self, operand: Node) -> Node {
                self.unary_expr(&$op, operand)
            }
        }
    };
}

impl AstBuilder {
    /// Creates a builder for an empty AST.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a string into the AST being built.
    pub fn intern(&mut self, string: &str) -> Str {
        self.ast.intern(string)
    }

    /// Creates a span inside of `file`, see [`Position::new`].
    pub fn position(
        &mut self,
        file: &str,
        first_line: u32,
        first_col: u32,
        last_line: u32,
        last_col: u32,
    ) -> Option<Position> {
        let file = self.intern(file);

        Position::new(file, first_line, first_col, last_line, last_col)
    }

    /// Sets the position that nodes built from now on are recorded with.
    /// `None` stops recording.
    pub fn at(&mut self, position: Option<Position>) -> &mut Self {
        self.current = position;
        self
    }

    /// The AST built so far.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The positions recorded so far.
    pub fn positions(&self) -> &SourcePositionRecorder {
        &self.positions
    }

    fn leaf(&mut self, data: NodeData) -> Node {
        self.ast.push(data)
    }

    fn interior(&mut self, kind: NodeKind, children: &[Node]) -> Node {
        debug_assert!(!kind.is_leaf());

        let node = self
            .ast
            .push(NodeData::Interior(kind, SmallVec::from_slice(children)));

        if let Some(pos) = self.current {
            self.positions.record(node, pos);
        }

        node
    }

    /// Builds an operator leaf.
    pub fn operator(&mut self, op: &'static Operator) -> Node {
        self.leaf(NodeData::Operator(op))
    }

    /// Builds a constant leaf.
    pub fn constant(&mut self, value: Constant) -> Node {
        self.leaf(NodeData::Constant(value))
    }

    /// Builds an integer constant leaf.
    pub fn int(&mut self, value: i64) -> Node {
        self.constant(Constant::Int(value))
    }

    /// Builds a string constant leaf.
    pub fn string(&mut self, value: &str) -> Node {
        let s = self.intern(value);

        self.constant(Constant::Str(s))
    }

    /// Builds an empty leaf.
    pub fn empty(&mut self) -> Node {
        self.leaf(NodeData::Empty)
    }

    /// Builds `VAR[name]`.
    pub fn var(&mut self, name: &str) -> Node {
        let name = self.string(name);

        self.interior(NodeKind::Var, &[name])
    }

    /// Builds an expression over `op`, `BINARY_EXPR[op, lhs, rhs]` or
    /// `UNARY_EXPR[op, operand]` depending on the operator's arity.
    ///
    /// Returns `None` without building anything if `operands` does not have
    /// exactly as many nodes as `op` takes.
    ///
    /// ```
    /// # use castor::ast::*;
    /// let mut b = AstBuilder::new();
    /// let x = b.var("x");
    ///
    /// assert!(b.expr(&NEG, &[x]).is_some());
    /// assert!(b.expr(&NEG, &[x, x]).is_none());
    /// ```
    pub fn expr(&mut self, op: &'static Operator, operands: &[Node]) -> Option<Node> {
        match (op.arity(), operands) {
            (Arity::Binary, [lhs, rhs]) => Some(self.binary_expr(op, *lhs, *rhs)),
            (Arity::Unary, [operand]) => Some(self.unary_expr(op, *operand)),
            _ => None,
        }
    }

    fn binary_expr(&mut self, op: &'static Operator, lhs: Node, rhs: Node) -> Node {
        let op = self.operator(op);

        self.interior(NodeKind::BinaryExpr, &[op, lhs, rhs])
    }

    fn unary_expr(&mut self, op: &'static Operator, operand: Node) -> Node {
        let op = self.operator(op);

        self.interior(NodeKind::UnaryExpr, &[op, operand])
    }

    /// Builds a binary expression for an operation with no precise operator.
    pub fn binary_arbitrary(&mut self, lhs: Node, rhs: Node) -> Node {
        self.binary_expr(&BINARY_ARBITRARY, lhs, rhs)
    }

    /// Builds a unary expression for an operation with no precise operator.
    pub fn unary_arbitrary(&mut self, operand: Node) -> Node {
        self.unary_expr(&UNARY_ARBITRARY, operand)
    }

    binary_builder!(add, ADD, "add");
    binary_builder!(sub, SUB, "sub");
    binary_builder!(mul, MUL, "mul");
    binary_builder!(div, DIV, "div");
    binary_builder!(rem, REM, "rem");
    binary_builder!(bit_and, BIT_AND, "and");
    binary_builder!(bit_or, BIT_OR, "or");
    binary_builder!(bit_xor, BIT_XOR, "xor");
    binary_builder!(shl, SHL, "shl");
    binary_builder!(shr, SHR, "shr");
    binary_builder!(eq, EQ, "eq");
    binary_builder!(ne, NE, "ne");
    binary_builder!(lt, LT, "lt");
    binary_builder!(le, LE, "le");
    binary_builder!(gt, GT, "gt");
    binary_builder!(ge, GE, "ge");
    unary_builder!(neg, NEG, "neg");
    unary_builder!(not, NOT, "not");
    unary_builder!(bit_not, BIT_NOT, "bitnot");

    /// Builds `PRIMITIVE[name, operands...]`, for operations whose operand count
    /// no operator can represent.
    pub fn primitive(&mut self, name: &str, operands: &[Node]) -> Node {
        let mut children = SmallVec::<[Node; 4]>::new();

        children.push(self.string(name));
        children.extend_from_slice(operands);

        self.interior(NodeKind::Primitive, &children)
    }

    /// Builds `CALL[target, args...]` and records it as a call site.
    pub fn call(&mut self, target: Node, args: &[Node]) -> Node {
        let mut children = SmallVec::<[Node; 4]>::new();

        children.push(target);
        children.extend_from_slice(args);

        let callee = match self.ast.kind(target) {
            NodeKind::Var => self
                .ast
                .child(target, 0)
                .and_then(|name| self.ast.constant(name))
                .and_then(Constant::as_str),
            _ => None,
        };

        let call = self.interior(NodeKind::Call, &children);

        self.ast.record_call(CallSite {
            call,
            target,
            callee,
        });

        call
    }

    /// Builds `ASSIGN[lhs, rhs]`.
    pub fn assign(&mut self, lhs: Node, rhs: Node) -> Node {
        self.interior(NodeKind::Assign, &[lhs, rhs])
    }

    /// Builds `RETURN[]` or `RETURN[value]`.
    pub fn ret(&mut self, value: Option<Node>) -> Node {
        match value {
            Some(v) => self.interior(NodeKind::Return, &[v]),
            None => self.interior(NodeKind::Return, &[]),
        }
    }

    /// Builds `GOTO[label]`.
    pub fn goto(&mut self, label: &str) -> Node {
        let label = self.string(label);

        self.interior(NodeKind::Goto, &[label])
    }

    /// Builds `IF_GOTO[condition, label]`.
    pub fn if_goto(&mut self, condition: Node, label: &str) -> Node {
        let label = self.string(label);

        self.interior(NodeKind::IfGoto, &[condition, label])
    }

    /// Builds `LABEL[name]`.
    pub fn label(&mut self, name: &str) -> Node {
        let name = self.string(name);

        self.interior(NodeKind::Label, &[name])
    }

    /// Builds `BLOCK_STMT[stmts...]`.
    pub fn block(&mut self, stmts: &[Node]) -> Node {
        self.interior(NodeKind::BlockStmt, stmts)
    }

    /// Finishes building, handing back the AST and every position recorded for it.
    pub fn finish(self) -> (Ast, SourcePositionRecorder) {
        (self.ast, self.positions)
    }
}
