//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ast::Node;
use crate::utility::{SaHashMap, Str};
use static_assertions::assert_eq_size;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// A span of source text, from `(first_line, first_col)` to `(last_line, last_col)`.
///
/// Lines and columns are 1-based. The file name is interned in the string pool
/// of the [`Ast`](crate::ast::Ast) of the function the position belongs to.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "enable-serde", serde(try_from = "SpanFields"))]
pub struct Position {
    file: Str,
    first_line: u32,
    first_col: u32,
    last_line: u32,
    last_col: u32,
}

assert_eq_size!(Position, [u32; 5]);

// spans read back in go through the same checks as `Position::new`
#[cfg(feature = "enable-serde")]
#[derive(Deserialize)]
struct SpanFields {
    file: Str,
    first_line: u32,
    first_col: u32,
    last_line: u32,
    last_col: u32,
}

#[cfg(feature = "enable-serde")]
impl TryFrom<SpanFields> for Position {
    type Error = &'static str;

    fn try_from(f: SpanFields) -> Result<Self, Self::Error> {
        Position::new(f.file, f.first_line, f.first_col, f.last_line, f.last_col)
            .ok_or("span is backwards or uses a zero line/column")
    }
}

impl Position {
    /// Creates a span, returning `None` if the end comes before the start or
    /// if any line/column is zero.
    pub fn new(file: Str, first_line: u32, first_col: u32, last_line: u32, last_col: u32) -> Option<Self> {
        let ordered = (first_line, first_col) <= (last_line, last_col);
        let one_based = first_line > 0 && first_col > 0 && last_line > 0 && last_col > 0;

        (ordered && one_based).then_some(Self {
            file,
            first_line,
            first_col,
            last_line,
            last_col,
        })
    }

    /// The file the span is inside of.
    pub fn file(&self) -> Str {
        self.file
    }

    /// Line of the first character.
    pub fn first_line(&self) -> u32 {
        self.first_line
    }

    /// Column of the first character.
    pub fn first_col(&self) -> u32 {
        self.first_col
    }

    /// Line of the last character.
    pub fn last_line(&self) -> u32 {
        self.last_line
    }

    /// Column of the last character.
    pub fn last_col(&self) -> u32 {
        self.last_col
    }

    /// Checks if `other` is completely inside of `self`.
    pub fn contains(&self, other: &Position) -> bool {
        self.file == other.file
            && (self.first_line, self.first_col) <= (other.first_line, other.first_col)
            && (other.last_line, other.last_col) <= (self.last_line, self.last_col)
    }
}

/// Accumulates the source position of AST nodes while a function is being built.
///
/// Nodes without a recorded position are fine, not every node has one
/// (e.g. the operator leaf of an expression shares its parent's position).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct SourcePositionRecorder {
    positions: SaHashMap<Node, Position>,
}

impl SourcePositionRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the position of `node`, replacing any earlier one.
    pub fn record(&mut self, node: Node, position: Position) -> Option<Position> {
        self.positions.insert(node, position)
    }

    /// Gets the position recorded for `node`.
    pub fn get(&self, node: Node) -> Option<Position> {
        self.positions.get(&node).copied()
    }

    /// Number of nodes with a recorded position.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Checks if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Every `(node, position)` pair, ordered by node.
    pub fn iter(&self) -> impl Iterator<Item = (Node, Position)> + '_ {
        let mut pairs = self
            .positions
            .iter()
            .map(|(node, pos)| (*node, *pos))
            .collect::<Vec<_>>();

        pairs.sort_unstable_by_key(|(node, _)| *node);
        pairs.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaKey;
    use crate::utility::StringPool;

    fn file() -> Str {
        StringPool::new().insert("main.swift")
    }

    #[test]
    fn rejects_backwards_spans() {
        let f = file();

        assert!(Position::new(f, 3, 1, 2, 9).is_none());
        assert!(Position::new(f, 3, 5, 3, 4).is_none());
        assert!(Position::new(f, 0, 1, 1, 1).is_none());
        assert!(Position::new(f, 3, 5, 3, 5).is_some());
        assert!(Position::new(f, 1, 9, 4, 1).is_some());
    }

    #[test]
    fn containment() {
        let f = file();
        let func = Position::new(f, 8, 1, 12, 2).unwrap();
        let param = Position::new(f, 8, 14, 8, 24).unwrap();

        assert!(func.contains(&param));
        assert!(!param.contains(&func));
        assert!(func.contains(&func));
    }

    #[test]
    fn recorder_last_write_wins() {
        let f = file();
        let mut rec = SourcePositionRecorder::new();
        let n = Node::key_new(4);
        let first = Position::new(f, 1, 1, 1, 1).unwrap();
        let second = Position::new(f, 2, 1, 2, 1).unwrap();

        assert_eq!(rec.record(n, first), None);
        assert_eq!(rec.record(n, second), Some(first));
        assert_eq!(rec.get(n), Some(second));
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn recorder_iterates_in_node_order() {
        let f = file();
        let mut rec = SourcePositionRecorder::new();

        for i in [9usize, 2, 5] {
            rec.record(Node::key_new(i), Position::new(f, i as u32, 1, i as u32, 1).unwrap());
        }

        let order = rec.iter().map(|(n, _)| n.key_index()).collect::<Vec<_>>();

        assert_eq!(order, [2, 5, 9]);
        assert!(rec.get(Node::key_new(3)).is_none());
    }

    #[cfg(feature = "enable-serde")]
    #[test]
    fn deserializing_checks_the_span() {
        let f = file();
        let span = Position::new(f, 2, 3, 4, 1).unwrap();
        let json = serde_json::to_value(span).unwrap();

        assert_eq!(serde_json::from_value::<Position>(json.clone()).unwrap(), span);

        let mut backwards = json.clone();

        backwards["first_line"] = 9.into();

        assert!(serde_json::from_value::<Position>(backwards).is_err());

        let mut zero = json;

        zero["last_col"] = 0.into();

        assert!(serde_json::from_value::<Position>(zero).is_err());
    }
}
