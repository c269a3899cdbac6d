//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ast::NodeKind;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

#[cfg(feature = "enable-serde")]
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// How many operands an operator consumes.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum Arity {
    /// One operand, e.g. `neg`.
    Unary,
    /// Two operands, e.g. `add`.
    Binary,
}

impl Arity {
    /// Maps an operand count onto an arity, if there is one.
    pub fn from_operand_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(Arity::Unary),
            2 => Some(Arity::Binary),
            _ => None,
        }
    }

    /// The number of operands an operator of this arity takes.
    pub fn operands(self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }
}

/// The leaf node naming an operation inside of an expression subtree.
///
/// Operators are process-wide singletons. Every operator that exists is one of the
/// `static` items in this module, and since the fields are private there is no
/// way to create another one. This makes identity comparison meaningful: two
/// `&Operator`s are equal exactly when they are the same static, which the
/// [`PartialEq`] impl checks by address.
///
/// ```
/// # use castor::ast::*;
/// let a = Operator::from_tag("binary_arb").unwrap();
///
/// assert!(std::ptr::eq(a, &BINARY_ARBITRARY));
/// assert_ne!(&BINARY_ARBITRARY, &UNARY_ARBITRARY);
/// assert_eq!(BINARY_ARBITRARY.to_string(), "OP:binary_arb");
/// ```
pub struct Operator {
    tag: &'static str,
    arity: Arity,
}

macro_rules! operators {
    ($( $(#[$doc:meta])* $name:ident = $tag:literal, $arity:ident; )*) => {
        $(
            $(#[$doc])*
            pub static $name: Operator = Operator {
                tag: $tag,
                arity: Arity::$arity,
            };
        )*

        static CATALOG: &[&Operator] = &[$(&$name),*];
    };
}

operators! {
    /// Stands in for any two-operand operation that has no precise operator.
    ///
    /// The node still carries both operands, so an analysis sees that *some*
    /// binary effect flowed from them even though it can't say which.
    BINARY_ARBITRARY = "binary_arb", Binary;
    /// Stands in for any one-operand operation that has no precise operator.
    UNARY_ARBITRARY = "unary_arb", Unary;

    /// Addition
    ADD = "add", Binary;
    /// Subtraction
    SUB = "sub", Binary;
    /// Multiplication
    MUL = "mul", Binary;
    /// Division
    DIV = "div", Binary;
    /// Remainder
    REM = "rem", Binary;
    /// Bitwise AND
    BIT_AND = "and", Binary;
    /// Bitwise OR
    BIT_OR = "or", Binary;
    /// Bitwise XOR
    BIT_XOR = "xor", Binary;
    /// Left shift
    SHL = "shl", Binary;
    /// Right shift
    SHR = "shr", Binary;
    /// `==`
    EQ = "eq", Binary;
    /// `!=`
    NE = "ne", Binary;
    /// `<`
    LT = "lt", Binary;
    /// `<=`
    LE = "le", Binary;
    /// `>`
    GT = "gt", Binary;
    /// `>=`
    GE = "ge", Binary;

    /// Arithmetic negation
    NEG = "neg", Unary;
    /// Logical not
    NOT = "not", Unary;
    /// Bitwise complement
    BIT_NOT = "bitnot", Unary;
}

impl Operator {
    /// The discriminant naming this operator.
    #[inline]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// The number of operands this operator takes.
    #[inline]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Always [`NodeKind::Operator`], operators terminate a subtree.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        NodeKind::Operator
    }

    /// Checks if this is one of the two fallback identities.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        ptr::eq(self, &BINARY_ARBITRARY) || ptr::eq(self, &UNARY_ARBITRARY)
    }

    /// Gets the fallback identity that preserves `arity`.
    pub fn fallback(arity: Arity) -> &'static Operator {
        match arity {
            Arity::Unary => &UNARY_ARBITRARY,
            Arity::Binary => &BINARY_ARBITRARY,
        }
    }

    /// Finds the canonical operator for a tag that was transported as text.
    ///
    /// This is a lookup over the declared operators and never creates a new one,
    /// unknown tags get `None`.
    pub fn from_tag(tag: &str) -> Option<&'static Operator> {
        CATALOG.iter().copied().find(|op| op.tag == tag)
    }

    /// Picks the precise operator for `mnemonic` if one exists with a matching
    /// arity, otherwise the fallback for `arity`.
    ///
    /// This is how operator resolution absorbs instructions that are unknown
    /// (or known, but used with an unexpected operand count) without dropping them.
    pub fn resolve(mnemonic: &str, arity: Arity) -> &'static Operator {
        match Self::from_tag(mnemonic) {
            Some(op) if op.arity == arity && !op.is_fallback() => op,
            _ => Self::fallback(arity),
        }
    }

    /// Every operator in the catalog, fallbacks first.
    pub fn all() -> impl Iterator<Item = &'static Operator> + ExactSizeIterator {
        CATALOG.iter().copied()
    }
}

/// Gets the discriminant of `op`, same as [`Operator::tag`].
#[inline]
pub fn tag_of(op: &Operator) -> &'static str {
    op.tag()
}

/// Gets the node kind of `op`, same as [`Operator::kind`].
#[inline]
pub fn node_kind(op: &Operator) -> NodeKind {
    op.kind()
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for Operator {}

impl Hash for Operator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self, state)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OP:{}", self.tag)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OP:{}", self.tag)
    }
}

// operators cross serialization boundaries as their tag and are looked back up
// on the other side, the identity itself is never transported

#[cfg(feature = "enable-serde")]
impl Serialize for Operator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.tag)
    }
}

#[cfg(feature = "enable-serde")]
impl<'de> Deserialize<'de> for &'static Operator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;

        Operator::from_tag(&tag)
            .ok_or_else(|| D::Error::custom(format_args!("unknown operator tag `{tag}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utility::SaHashSet;
    use static_assertions::assert_impl_all;

    assert_impl_all!(&'static Operator: Send, Sync, Copy);

    #[test]
    fn fallback_tags() {
        assert_eq!(tag_of(&BINARY_ARBITRARY), "binary_arb");
        assert_eq!(tag_of(&UNARY_ARBITRARY), "unary_arb");
        assert_eq!(BINARY_ARBITRARY.arity(), Arity::Binary);
        assert_eq!(UNARY_ARBITRARY.arity(), Arity::Unary);
    }

    #[test]
    fn fallbacks_are_distinct() {
        assert_ne!(&BINARY_ARBITRARY, &UNARY_ARBITRARY);
        assert!(!ptr::eq(&BINARY_ARBITRARY, &UNARY_ARBITRARY));
    }

    #[test]
    fn repeated_access_yields_same_reference() {
        for op in Operator::all() {
            let again = Operator::from_tag(op.tag()).unwrap();

            assert!(ptr::eq(op, again), "{op} was not canonical");
            assert_eq!(op, again);
        }

        let first: &'static Operator = &BINARY_ARBITRARY;
        let second: &'static Operator = &BINARY_ARBITRARY;

        assert!(ptr::eq(first, second));
    }

    #[test]
    fn tags_are_unique() {
        let tags = Operator::all().map(|op| op.tag()).collect::<SaHashSet<_>>();

        assert_eq!(tags.len(), Operator::all().len());
    }

    #[test]
    fn identity_hashing() {
        let set = Operator::all().collect::<SaHashSet<_>>();

        assert_eq!(set.len(), Operator::all().len());
        assert!(set.contains(&BINARY_ARBITRARY));
    }

    #[test]
    fn every_operator_is_an_operator_leaf() {
        for op in Operator::all() {
            assert_eq!(node_kind(op), NodeKind::Operator);
            assert!(NodeKind::Operator.is_leaf());
        }
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(Operator::from_tag("frobnicate"), None);
        assert_eq!(Operator::from_tag("OP:add"), None);
        assert_eq!(Operator::from_tag(""), None);
    }

    #[test]
    fn resolve_precise() {
        assert!(ptr::eq(Operator::resolve("add", Arity::Binary), &ADD));
        assert!(ptr::eq(Operator::resolve("neg", Arity::Unary), &NEG));
    }

    #[test]
    fn resolve_unknown_falls_back_by_arity() {
        assert!(ptr::eq(
            Operator::resolve("builtin.fma_thing", Arity::Binary),
            &BINARY_ARBITRARY
        ));
        assert!(ptr::eq(
            Operator::resolve("builtin.popcount", Arity::Unary),
            &UNARY_ARBITRARY
        ));
    }

    #[test]
    fn resolve_arity_mismatch_falls_back() {
        // `neg` is unary, seeing it with two operands means the frontend
        // lowered something we don't model
        assert!(ptr::eq(Operator::resolve("neg", Arity::Binary), &BINARY_ARBITRARY));
        assert!(ptr::eq(Operator::resolve("add", Arity::Unary), &UNARY_ARBITRARY));
    }

    #[test]
    fn resolve_fallback_tag_maps_to_itself() {
        assert!(ptr::eq(
            Operator::resolve("unary_arb", Arity::Unary),
            &UNARY_ARBITRARY
        ));
        assert!(ptr::eq(
            Operator::resolve("unary_arb", Arity::Binary),
            &BINARY_ARBITRARY
        ));
    }

    #[test]
    fn is_fallback() {
        assert!(BINARY_ARBITRARY.is_fallback());
        assert!(UNARY_ARBITRARY.is_fallback());
        assert!(Operator::all().skip(2).all(|op| !op.is_fallback()));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", ADD), "OP:add");
        assert_eq!(format!("{:?}", UNARY_ARBITRARY), "OP:unary_arb");
    }

    #[cfg(feature = "enable-serde")]
    #[test]
    fn serde_goes_through_tag() {
        use serde_test::{assert_ser_tokens, Token};

        assert_ser_tokens(&BINARY_ARBITRARY, &[Token::Str("binary_arb")]);

        let op: &'static Operator = serde_json::from_str("\"unary_arb\"").unwrap();

        assert!(ptr::eq(op, &UNARY_ARBITRARY));
        assert!(serde_json::from_str::<&'static Operator>("\"nope\"").is_err());
    }
}
