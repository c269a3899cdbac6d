//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ast::{Ast, CallSite, Node, Position, SourcePositionRecorder};
use crate::entity::EntityError;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// The raw pieces of an [`EntityInfo`], before they have been checked.
///
/// This is a plain bag of owned data, [`EntityInfo::new`] is the only way to
/// turn it into something a consumer will accept.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct EntityParts {
    /// Name of the function, unique within its translation unit
    pub function_name: String,
    /// Storage for every node referenced by `basic_blocks`
    pub ast: Ast,
    /// Root of each basic block, the entry block first
    pub basic_blocks: Vec<Node>,
    /// Declared return type, opaque to this crate
    pub return_type: String,
    /// Declared parameter types, parallel to `argument_names`
    pub argument_types: Vec<String>,
    /// Parameter names in declaration order
    pub argument_names: Vec<String>,
    /// Positions recorded while `basic_blocks` were built
    pub positions: SourcePositionRecorder,
    /// Span of the whole declaration, `None` without source info
    pub function_position: Option<Position>,
    /// Span of each parameter, parallel to `argument_names`
    pub argument_positions: Vec<Position>,
}

/// One formal parameter of an entity.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Argument<'a> {
    /// The parameter's name
    pub name: &'a str,
    /// The parameter's declared type
    pub ty: &'a str,
    /// Where the parameter was declared
    pub position: Position,
}

/// Everything needed to build one analyzable function, as a single bundle.
///
/// Construction is the only point where an `EntityInfo` can change, after that
/// there are only accessors. Block roots must be nodes of the entity's AST, but
/// the subtrees under them are not traversed, whoever built them with an
/// [`AstBuilder`](crate::ast::AstBuilder) is responsible for their shape.
///
/// # Argument types
///
/// [`Self::argument_types`] are carried along but nothing downstream reads them
/// yet. They are still checked against the names so positional correspondence
/// holds for any consumer that starts to.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "enable-serde", serde(try_from = "EntityParts"))]
pub struct EntityInfo {
    function_name: String,
    ast: Ast,
    basic_blocks: Vec<Node>,
    return_type: String,
    argument_types: Vec<String>,
    argument_names: Vec<String>,
    positions: SourcePositionRecorder,
    function_position: Option<Position>,
    argument_positions: Vec<Position>,
}

impl EntityInfo {
    /// Validates `parts` and builds the entity.
    ///
    /// Fails if the function name is empty, if the argument names, types
    /// and positions are not all the same length, or if a block root or a
    /// position refers to something that is not in `parts.ast`. Only the
    /// block roots are checked, the subtrees under them are not walked.
    pub fn new(parts: EntityParts) -> Result<Self, EntityError> {
        if parts.function_name.is_empty() {
            return Err(EntityError::EmptyName);
        }

        let names = parts.argument_names.len();
        let types = parts.argument_types.len();
        let positions = parts.argument_positions.len();

        if names != types || names != positions {
            return Err(EntityError::ArityMismatch {
                function: parts.function_name,
                names,
                types,
                positions,
            });
        }

        if let Some(index) = parts.basic_blocks.iter().position(|bb| !parts.ast.contains(*bb)) {
            return Err(EntityError::DanglingBlock {
                function: parts.function_name,
                index,
            });
        }

        let ast = &parts.ast;
        let in_ast = |pos: &Position| ast.get_string(pos.file()).is_some();
        let positions_resolve = parts.function_position.iter().all(in_ast)
            && parts.argument_positions.iter().all(in_ast)
            && parts
                .positions
                .iter()
                .all(|(node, pos)| ast.contains(node) && in_ast(&pos));

        if !positions_resolve {
            return Err(EntityError::DanglingPosition {
                function: parts.function_name,
            });
        }

        tracing::trace!(
            function = %parts.function_name,
            blocks = parts.basic_blocks.len(),
            arguments = names,
            "built entity"
        );

        Ok(Self {
            function_name: parts.function_name,
            ast: parts.ast,
            basic_blocks: parts.basic_blocks,
            return_type: parts.return_type,
            argument_types: parts.argument_types,
            argument_names: parts.argument_names,
            positions: parts.positions,
            function_position: parts.function_position,
            argument_positions: parts.argument_positions,
        })
    }

    /// The function's name.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// The AST that every block lives in.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The root of every basic block, in the order they were given.
    pub fn basic_blocks(&self) -> &[Node] {
        &self.basic_blocks
    }

    /// The entry block, `None` for a declaration.
    pub fn entry_block(&self) -> Option<Node> {
        self.basic_blocks.first().copied()
    }

    /// Checks if this is a declaration with no body (external or abstract).
    pub fn is_declaration(&self) -> bool {
        self.basic_blocks.is_empty()
    }

    /// The declared return type.
    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    /// The declared parameter types. See the type-level docs, these are carried
    /// but not consumed.
    pub fn argument_types(&self) -> &[String] {
        &self.argument_types
    }

    /// The parameter names in declaration order.
    pub fn argument_names(&self) -> &[String] {
        &self.argument_names
    }

    /// The span of each parameter.
    pub fn argument_positions(&self) -> &[Position] {
        &self.argument_positions
    }

    /// Iterates over the parameters with their name, type and position together.
    pub fn arguments(&self) -> impl Iterator<Item = Argument<'_>> + ExactSizeIterator {
        self.argument_names
            .iter()
            .zip(&self.argument_types)
            .zip(&self.argument_positions)
            .map(|((name, ty), position)| Argument {
                name,
                ty,
                position: *position,
            })
    }

    /// The span of the whole declaration.
    pub fn function_position(&self) -> Option<Position> {
        self.function_position
    }

    /// Every position recorded while the blocks were built.
    pub fn source_positions(&self) -> &SourcePositionRecorder {
        &self.positions
    }

    /// Every call in the function, recorded while the blocks were built.
    pub fn call_sites(&self) -> &[CallSite] {
        self.ast.call_sites()
    }

    /// Takes the entity apart again. Meant for consumers that need to move the
    /// pieces into their own representation.
    pub fn into_parts(self) -> EntityParts {
        EntityParts {
            function_name: self.function_name,
            ast: self.ast,
            basic_blocks: self.basic_blocks,
            return_type: self.return_type,
            argument_types: self.argument_types,
            argument_names: self.argument_names,
            positions: self.positions,
            function_position: self.function_position,
            argument_positions: self.argument_positions,
        }
    }
}

impl TryFrom<EntityParts> for EntityInfo {
    type Error = EntityError;

    fn try_from(parts: EntityParts) -> Result<Self, Self::Error> {
        Self::new(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaKey;
    use crate::ast::{AstBuilder, AstWriter, NodeKind, BINARY_ARBITRARY};
    use static_assertions::assert_impl_all;
    use std::ptr;

    assert_impl_all!(EntityInfo: Send, Sync);

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn parts_with(names: usize, types: usize, positions: usize) -> EntityParts {
        let mut b = AstBuilder::new();
        let pos = b.position("test.swift", 1, 1, 1, 5).unwrap();
        let (ast, recorder) = b.finish();

        EntityParts {
            function_name: "f".into(),
            ast,
            basic_blocks: vec![],
            return_type: "Void".into(),
            argument_types: vec!["Int".into(); types],
            argument_names: (0..names).map(|i| format!("a{i}")).collect(),
            positions: recorder,
            function_position: None,
            argument_positions: vec![pos; positions],
        }
    }

    #[test]
    fn mismatched_positions_fail() {
        let err = EntityInfo::new(parts_with(3, 3, 2)).unwrap_err();

        assert_eq!(
            err,
            EntityError::ArityMismatch {
                function: "f".into(),
                names: 3,
                types: 3,
                positions: 2,
            }
        );
    }

    #[test]
    fn mismatched_types_fail() {
        assert!(matches!(
            EntityInfo::new(parts_with(2, 1, 2)),
            Err(EntityError::ArityMismatch { types: 1, .. })
        ));
    }

    #[test]
    fn matching_lengths_succeed_in_order() {
        let info = EntityInfo::new(parts_with(3, 3, 3)).unwrap();

        assert_eq!(info.argument_names(), &strings(&["a0", "a1", "a2"])[..]);
        assert_eq!(info.argument_types().len(), 3);
        assert_eq!(info.argument_positions().len(), 3);
        assert_eq!(
            info.arguments().map(|a| a.name).collect::<Vec<_>>(),
            ["a0", "a1", "a2"]
        );
    }

    #[test]
    fn empty_name_fails() {
        let mut parts = parts_with(0, 0, 0);

        parts.function_name.clear();

        assert_eq!(EntityInfo::new(parts).unwrap_err(), EntityError::EmptyName);
    }

    #[test]
    fn empty_body_is_a_declaration() {
        let info = EntityInfo::new(parts_with(1, 1, 1)).unwrap();

        assert!(info.is_declaration());
        assert!(info.basic_blocks().is_empty());
        assert_eq!(info.entry_block(), None);
        assert_eq!(info.function_position(), None);
    }

    #[test]
    fn blocks_keep_their_order() {
        let mut b = AstBuilder::new();
        let roots = ["bb0", "bb1", "bb2"]
            .iter()
            .map(|name| {
                let label = b.label(name);

                b.block(&[label])
            })
            .collect::<Vec<_>>();
        let (ast, positions) = b.finish();

        let info = EntityInfo::new(EntityParts {
            function_name: "g".into(),
            ast,
            basic_blocks: vec![roots[0], roots[1], roots[2], roots[1]],
            positions,
            ..EntityParts::default()
        })
        .unwrap();

        let labels = info
            .basic_blocks()
            .iter()
            .map(|bb| {
                let label = info.ast().child(*bb, 0).unwrap();

                info.ast().name(label).unwrap()
            })
            .collect::<Vec<_>>();

        // no reordering, no de-duplication
        assert_eq!(labels, ["bb0", "bb1", "bb2", "bb1"]);
        assert_eq!(info.entry_block(), Some(roots[0]));
    }

    #[test]
    fn foo_round_trip() {
        let mut b = AstBuilder::new();
        let func_pos = b.position("foo.swift", 1, 1, 3, 2);
        let x_pos = b.position("foo.swift", 1, 10, 1, 15).unwrap();
        let y_pos = b.position("foo.swift", 1, 17, 1, 22).unwrap();
        let body_pos = b.position("foo.swift", 2, 5, 2, 17);

        let label = b.label("bb0");

        b.at(body_pos);

        let x = b.var("x");
        let y = b.var("y");
        let sum = b.binary_arbitrary(x, y);
        let ret = b.ret(Some(sum));

        b.at(None);

        let block = b.block(&[label, ret]);
        let (ast, positions) = b.finish();

        let info = EntityInfo::new(EntityParts {
            function_name: "foo".into(),
            ast,
            basic_blocks: vec![block],
            return_type: "Int".into(),
            argument_types: strings(&["Int", "Int"]),
            argument_names: strings(&["x", "y"]),
            positions,
            function_position: func_pos,
            argument_positions: vec![x_pos, y_pos],
        })
        .unwrap();

        assert_eq!(info.function_name(), "foo");
        assert_eq!(info.return_type(), "Int");
        assert_eq!(info.basic_blocks().len(), 1);
        assert_eq!(info.argument_positions().len(), 2);
        assert!(info.function_position().unwrap().contains(&x_pos));

        let bb = info.basic_blocks()[0];
        let ast = info.ast();
        let instructions = ast
            .children(bb)
            .iter()
            .filter(|stmt| ast.kind(**stmt) != NodeKind::Label)
            .copied()
            .collect::<Vec<_>>();

        assert_eq!(instructions.len(), 1);

        let expr = ast.child(instructions[0], 0).unwrap();
        let op = ast.expr_operator(expr).unwrap();

        assert!(ptr::eq(op, &BINARY_ARBITRARY));
        assert_eq!(op.tag(), "binary_arb");
        assert_eq!(info.source_positions().get(ret), body_pos);
        assert_eq!(
            AstWriter::new(ast).stringify(bb),
            "(BLOCK_STMT\n  (LABEL \"bb0\")\n  (RETURN (BINARY_EXPR OP:binary_arb (VAR \"x\") (VAR \"y\"))))"
        );
    }

    #[cfg(feature = "enable-serde")]
    #[test]
    fn deserializing_validates() {
        let json = serde_json::to_string(&parts_with(2, 2, 1)).unwrap();

        assert!(serde_json::from_str::<EntityInfo>(&json).is_err());

        let json = serde_json::to_string(&parts_with(2, 2, 2)).unwrap();
        let info: EntityInfo = serde_json::from_str(&json).unwrap();

        assert_eq!(info.argument_names().len(), 2);
    }

    #[test]
    fn dangling_block_fails() {
        let mut parts = parts_with(0, 0, 0);

        parts.basic_blocks.push(Node::key_new(57));

        assert_eq!(
            EntityInfo::new(parts).unwrap_err(),
            EntityError::DanglingBlock {
                function: "f".into(),
                index: 0,
            }
        );
    }

    #[test]
    fn position_from_another_ast_fails() {
        let mut other = AstBuilder::new();

        other.intern("unrelated.swift");

        let foreign = other.position("other.swift", 1, 1, 1, 2).unwrap();
        let mut parts = parts_with(0, 0, 0);

        parts.function_position = Some(foreign);

        assert_eq!(
            EntityInfo::new(parts).unwrap_err(),
            EntityError::DanglingPosition {
                function: "f".into(),
            }
        );
    }

    #[cfg(feature = "enable-serde")]
    #[test]
    fn deserializing_rejects_bad_spans_and_blocks() {
        let mut b = AstBuilder::new();
        let pos = b.position("f.swift", 1, 1, 1, 5).unwrap();
        let label = b.label("bb0");
        let block = b.block(&[label]);
        let (ast, positions) = b.finish();

        let info = EntityInfo::new(EntityParts {
            function_name: "f".into(),
            ast,
            basic_blocks: vec![block],
            return_type: "Void".into(),
            argument_types: vec!["Int".into()],
            argument_names: vec!["x".into()],
            positions,
            function_position: None,
            argument_positions: vec![pos],
        })
        .unwrap();

        let json = serde_json::to_value(&info).unwrap();

        assert!(serde_json::from_value::<EntityInfo>(json.clone()).is_ok());

        let mut backwards = json.clone();

        backwards["argument_positions"][0]["first_line"] = 9.into();

        assert!(serde_json::from_value::<EntityInfo>(backwards).is_err());

        let mut dangling = json;

        dangling["basic_blocks"] = serde_json::json!([57]);

        let err = serde_json::from_value::<EntityInfo>(dangling).unwrap_err();

        assert!(err.to_string().contains("is not a node of its AST"));
    }
}
