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
use std::fmt::{self, Write};

/// Renders subtrees as S-expressions for debugging and for tests.
///
/// Statements inside of a `BLOCK_STMT` get a line each, every other node is
/// written inline:
///
/// ```other
/// (BLOCK_STMT
///   (LABEL "bb0")
///   (ASSIGN (VAR "z") (BINARY_EXPR OP:binary_arb (VAR "x") (VAR "y")))
///   (RETURN (VAR "z")))
/// ```
pub struct AstWriter<'a> {
    ast: &'a Ast,
    positions: Option<&'a SourcePositionRecorder>,
}

impl<'a> AstWriter<'a> {
    /// Creates a writer for nodes in `ast`.
    pub fn new(ast: &'a Ast) -> Self {
        Self {
            ast,
            positions: None,
        }
    }

    /// Makes the writer annotate block statements with their recorded positions.
    pub fn with_positions(self, positions: &'a SourcePositionRecorder) -> Self {
        Self {
            ast: self.ast,
            positions: Some(positions),
        }
    }

    /// Writes the subtree rooted at `root` into `out`.
    pub fn write(&self, root: Node, out: &mut impl Write) -> fmt::Result {
        self.write_node(root, 0, out)
    }

    /// Stringifies the subtree rooted at `root`.
    pub fn stringify(&self, root: Node) -> String {
        let mut out = String::default();

        // writing into a `String` cannot fail
        let _ = self.write(root, &mut out);

        out
    }

    fn write_constant(&self, value: Constant, out: &mut impl Write) -> fmt::Result {
        match value {
            Constant::Int(i) => write!(out, "{i}"),
            Constant::Float(_) => write!(out, "{:?}", value.as_float().unwrap_or_default()),
            Constant::Bool(b) => write!(out, "{b}"),
            Constant::Str(s) => write!(out, "{:?}", self.ast.string(s)),
            Constant::Null => write!(out, "null"),
        }
    }

    fn write_position(&self, node: Node, out: &mut impl Write) -> fmt::Result {
        let pos = match self.positions.and_then(|p| p.get(node)) {
            Some(pos) => pos,
            None => return Ok(()),
        };

        write!(
            out,
            "  ; {}:{}:{}-{}:{}",
            self.ast.string(pos.file()),
            pos.first_line(),
            pos.first_col(),
            pos.last_line(),
            pos.last_col()
        )
    }

    fn write_node(&self, node: Node, depth: usize, out: &mut impl Write) -> fmt::Result {
        match self.ast.data(node) {
            NodeData::Operator(op) => write!(out, "{op}"),
            NodeData::Constant(c) => self.write_constant(*c, out),
            NodeData::Empty => write!(out, "EMPTY"),
            NodeData::Interior(NodeKind::BlockStmt, stmts) => {
                write!(out, "({}", NodeKind::BlockStmt)?;

                for stmt in stmts.iter() {
                    write!(out, "\n{}", "  ".repeat(depth + 1))?;
                    self.write_node(*stmt, depth + 1, out)?;
                    self.write_position(*stmt, out)?;
                }

                write!(out, ")")
            }
            NodeData::Interior(kind, children) => {
                write!(out, "({kind}")?;

                for child in children.iter() {
                    write!(out, " ")?;
                    self.write_node(*child, depth, out)?;
                }

                write!(out, ")")
            }
        }
    }
}
