//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::ArenaMap;
use crate::ast::Operator;
use crate::dense_arena_key;
use crate::utility::{Str, StringPool};
use smallvec::SmallVec;
use static_assertions::assert_eq_size;
use std::fmt;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

dense_arena_key! {
    /// References a single node inside of a function's [`Ast`].
    ///
    /// A `Node` is only meaningful to the [`Ast`] that created it.
    pub struct Node;
}

/// The shape of a node, i.e. what its children mean.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    /// Leaf, an [`Operator`] identity.
    Operator,
    /// Leaf, a literal [`Constant`].
    Constant,
    /// Leaf, a placeholder with no meaning.
    Empty,
    /// `[name]`, a read of a named value. `name` is a string constant.
    Var,
    /// `[op, lhs, rhs]`
    BinaryExpr,
    /// `[op, operand]`
    UnaryExpr,
    /// `[name, operands...]`, an operation with no operator that fits its arity.
    Primitive,
    /// `[target, args...]`
    Call,
    /// `[lhs, rhs]`
    Assign,
    /// `[]` or `[value]`
    Return,
    /// `[label]`
    Goto,
    /// `[condition, label]`, jumps to `label` when `condition` holds.
    IfGoto,
    /// `[name]`, marks the start of a basic block.
    Label,
    /// `[stmts...]`, a basic block.
    BlockStmt,
}

impl NodeKind {
    /// Checks if nodes of this kind never have children.
    pub fn is_leaf(self) -> bool {
        matches!(self, NodeKind::Operator | NodeKind::Constant | NodeKind::Empty)
    }

    /// The upper-case name used by the debug printer.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Operator => "OPERATOR",
            NodeKind::Constant => "CONSTANT",
            NodeKind::Empty => "EMPTY",
            NodeKind::Var => "VAR",
            NodeKind::BinaryExpr => "BINARY_EXPR",
            NodeKind::UnaryExpr => "UNARY_EXPR",
            NodeKind::Primitive => "PRIMITIVE",
            NodeKind::Call => "CALL",
            NodeKind::Assign => "ASSIGN",
            NodeKind::Return => "RETURN",
            NodeKind::Goto => "GOTO",
            NodeKind::IfGoto => "IF_GOTO",
            NodeKind::Label => "LABEL",
            NodeKind::BlockStmt => "BLOCK_STMT",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A literal value stored in a [`NodeKind::Constant`] leaf.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum Constant {
    /// An integer literal
    Int(i64),
    /// A floating-point literal, stored as its bit pattern so constants stay `Eq`
    Float(u64),
    /// A boolean literal
    Bool(bool),
    /// A string, also used for names inside of `VAR`, `LABEL` and `GOTO`
    Str(Str),
    /// `nil`/`null`
    Null,
}

impl Constant {
    /// Creates a float constant from a real `f64`.
    pub fn float(value: f64) -> Self {
        Constant::Float(value.to_bits())
    }

    /// Gets the `f64` back out of a float constant.
    pub fn as_float(self) -> Option<f64> {
        match self {
            Constant::Float(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }

    /// Gets the string handle out of a string constant.
    pub fn as_str(self) -> Option<Str> {
        match self {
            Constant::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// The data stored for a single node.
///
/// Leaves carry a value and no children, every other node carries its kind
/// and an ordered list of children. Children are always created before their
/// parents, so a child's key is always smaller than its parent's.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum NodeData {
    /// See [`NodeKind::Operator`]
    Operator(&'static Operator),
    /// See [`NodeKind::Constant`]
    Constant(Constant),
    /// See [`NodeKind::Empty`]
    Empty,
    /// Any non-leaf node
    Interior(NodeKind, SmallVec<[Node; 3]>),
}

assert_eq_size!(Node, u32);

impl NodeData {
    /// Gets the kind of the node.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Operator(_) => NodeKind::Operator,
            NodeData::Constant(_) => NodeKind::Constant,
            NodeData::Empty => NodeKind::Empty,
            NodeData::Interior(kind, _) => *kind,
        }
    }

    /// Gets the children of the node, always empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            NodeData::Interior(_, children) => children,
            _ => &[],
        }
    }
}

/// A direct or indirect call, recorded while the call node was being built.
///
/// Consumers that need call targets read these instead of re-walking every block.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct CallSite {
    /// The `CALL` node itself
    pub call: Node,
    /// The first child of `call`
    pub target: Node,
    /// The name of the callee, when `target` is a `VAR`
    pub callee: Option<Str>,
}

/// Owns every node of one function, and the strings those nodes refer to.
///
/// An `Ast` can only be grown through an [`AstBuilder`](crate::ast::AstBuilder),
/// once it has been finished it is read-only.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Ast {
    nodes: ArenaMap<Node, NodeData>,
    strings: StringPool,
    call_sites: Vec<CallSite>,
}

impl Ast {
    pub(in crate::ast) fn push(&mut self, data: NodeData) -> Node {
        debug_assert!(
            data.children().iter().all(|child| self.nodes.contains(*child)),
            "children must exist before their parent"
        );

        self.nodes.insert(data)
    }

    pub(in crate::ast) fn intern(&mut self, string: &str) -> Str {
        self.strings.insert(string)
    }

    pub(in crate::ast) fn record_call(&mut self, site: CallSite) {
        self.call_sites.push(site);
    }

    /// Gets the data for `node`.
    pub fn data(&self, node: Node) -> &NodeData {
        &self.nodes[node]
    }

    /// Gets the kind of `node`.
    pub fn kind(&self, node: Node) -> NodeKind {
        self.nodes[node].kind()
    }

    /// Gets the ordered children of `node`.
    pub fn children(&self, node: Node) -> &[Node] {
        self.nodes[node].children()
    }

    /// Gets the `i`th child of `node`, if it has that many.
    pub fn child(&self, node: Node, i: usize) -> Option<Node> {
        self.children(node).get(i).copied()
    }

    /// Gets the operator identity if `node` is an operator leaf.
    pub fn operator(&self, node: Node) -> Option<&'static Operator> {
        match self.nodes[node] {
            NodeData::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// Gets the constant if `node` is a constant leaf.
    pub fn constant(&self, node: Node) -> Option<Constant> {
        match self.nodes[node] {
            NodeData::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// Gets the operator of an expression node (`BINARY_EXPR` or `UNARY_EXPR`).
    pub fn expr_operator(&self, node: Node) -> Option<&'static Operator> {
        match self.kind(node) {
            NodeKind::BinaryExpr | NodeKind::UnaryExpr => self.operator(self.child(node, 0)?),
            _ => None,
        }
    }

    /// Gets the name of a node whose first child is a string constant, i.e.
    /// `VAR`, `LABEL`, `GOTO` and `PRIMITIVE`.
    pub fn name(&self, node: Node) -> Option<&str> {
        let first = self.child(node, 0)?;
        let s = self.constant(first)?.as_str()?;

        Some(&self.strings[s])
    }

    /// Resolves an interned string.
    pub fn string(&self, s: Str) -> &str {
        &self.strings[s]
    }

    /// Resolves an interned string, `None` if `s` did not come from this AST.
    pub fn get_string(&self, s: Str) -> Option<&str> {
        self.strings.get(s)
    }

    /// Every call built into this AST, in the order they were built.
    pub fn call_sites(&self) -> &[CallSite] {
        &self.call_sites
    }

    /// Checks if `node` was created by this AST.
    pub fn contains(&self, node: Node) -> bool {
        self.nodes.contains(node)
    }

    /// The total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if no nodes have been built.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, ADD, BINARY_ARBITRARY, UNARY_ARBITRARY};
    use std::ptr;

    #[test]
    fn leaves_have_no_children() {
        let mut b = AstBuilder::new();
        let op = b.operator(&UNARY_ARBITRARY);
        let c = b.int(5);
        let e = b.empty();
        let ast = b.finish().0;

        for leaf in [op, c, e] {
            assert!(ast.kind(leaf).is_leaf());
            assert!(ast.children(leaf).is_empty());
            assert_eq!(ast.child(leaf, 0), None);
        }
    }

    #[test]
    fn binary_expr_shape() {
        let mut b = AstBuilder::new();
        let x = b.var("x");
        let y = b.var("y");
        let sum = b.add(x, y);
        let ast = b.finish().0;

        assert_eq!(ast.kind(sum), NodeKind::BinaryExpr);
        assert_eq!(ast.children(sum).len(), 3);
        assert_eq!(ast.child(sum, 1), Some(x));
        assert_eq!(ast.child(sum, 2), Some(y));
        assert!(ptr::eq(ast.expr_operator(sum).unwrap(), &ADD));
        assert_eq!(ast.name(x), Some("x"));
    }

    #[test]
    fn children_precede_parents() {
        let mut b = AstBuilder::new();
        let x = b.var("x");
        let y = b.int(1);
        let expr = b.binary_arbitrary(x, y);
        b.ret(Some(expr));

        let ast = b.finish().0;

        for (node, data) in ast.nodes.iter() {
            for child in data.children() {
                assert!(*child < node);
            }
        }

        // name, VAR, CONSTANT, OP, BINARY_EXPR, RETURN
        assert_eq!(ast.len(), 6);
    }

    #[test]
    fn float_constants_keep_their_value() {
        let c = Constant::float(2.5);

        assert_eq!(c.as_float(), Some(2.5));
        assert_eq!(Constant::Int(3).as_float(), None);
        assert_eq!(c, Constant::float(2.5));
    }

    #[test]
    fn kind_names() {
        assert_eq!(NodeKind::BinaryExpr.to_string(), "BINARY_EXPR");
        assert_eq!(NodeKind::IfGoto.name(), "IF_GOTO");
        assert!(!NodeKind::BlockStmt.is_leaf());
    }

    #[cfg(feature = "enable-serde")]
    #[test]
    fn operators_survive_transport_as_canonical_identities() {
        let mut b = AstBuilder::new();
        let x = b.var("x");
        let y = b.var("y");
        let expr = b.binary_arbitrary(x, y);
        let ast = b.finish().0;

        let json = serde_json::to_string(&ast).unwrap();

        assert!(json.contains("\"binary_arb\""));

        let back: Ast = serde_json::from_str(&json).unwrap();

        assert!(ptr::eq(back.expr_operator(expr).unwrap(), &BINARY_ARBITRARY));
        assert_eq!(back.name(x), Some("x"));
        assert_eq!(back.len(), ast.len());
    }
}
