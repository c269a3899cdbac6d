//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use ahash::AHashMap;
use std::ops::Index;
use std::sync::Arc;

#[cfg(feature = "enable-serde")]
use serde::{de::SeqAccess, de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
#[cfg(feature = "enable-serde")]
use std::fmt::{Formatter, Result as FmtResult};

/// A reference to a string inside of a given [`StringPool`].
///
/// Identifiers, labels and file names show up over and over in a single function
/// body, so the AST stores these 4-byte handles instead of owned strings. They
/// can only be obtained from [`StringPool::insert`] and only mean something to
/// the pool that produced them.
///
/// ```
/// # use castor::utility::*;
/// let mut pool = StringPool::new();
/// let s = pool.insert("self");
///
/// assert_eq!(&pool[s], "self");
/// ```
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Str(u32);

/// De-duplicating storage for strings, maps [`Str`]s back to the text they
/// were created from.
#[derive(Debug, Clone, Default)]
pub struct StringPool {
    // strings live in `strings` in insertion order, `refs` maps the text back
    // to its index so repeated inserts hand out the same `Str`
    strings: Vec<Arc<str>>,
    refs: AHashMap<Arc<str>, Str>,
}

impl StringPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "enable-serde")]
    fn with_strings(strings: &[String]) -> Self {
        let mut instance = Self::new();

        // `strings` is in index order, re-inserting in the same order gives
        // every string its original `Str` back
        for string in strings {
            instance.insert(string);
        }

        instance
    }

    /// Interns `string`, returning the existing [`Str`] if the same text was
    /// inserted before.
    pub fn insert(&mut self, string: &str) -> Str {
        if let Some(s) = self.refs.get(string) {
            return *s;
        }

        let shared: Arc<str> = Arc::from(string);
        let index = Str(
            u32::try_from(self.strings.len()).expect("string pool cannot hold more than u32::MAX strings"),
        );

        self.strings.push(Arc::clone(&shared));
        self.refs.insert(shared, index);

        index
    }

    /// Resolves `index`, returning `None` if it came from a different pool
    /// with more strings in it.
    pub fn get(&self, index: Str) -> Option<&str> {
        self.strings.get(index.0 as usize).map(|rc| rc.as_ref())
    }

    /// The number of distinct strings in the pool.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Checks if the pool has no strings in it.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Index<Str> for StringPool {
    type Output = str;

    fn index(&self, index: Str) -> &Self::Output {
        self.strings[index.0 as usize].as_ref()
    }
}

#[cfg(feature = "enable-serde")]
impl Serialize for StringPool {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // order matters, every `Str` stored elsewhere is an index into this sequence
        serializer.collect_seq(self.strings.iter().map(|rc| rc.as_ref()))
    }
}

#[cfg(feature = "enable-serde")]
struct StringPoolVisitor;

#[cfg(feature = "enable-serde")]
impl<'de> Visitor<'de> for StringPoolVisitor {
    type Value = StringPool;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "a sequence of `str` values")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values: Vec<String> = Vec::with_capacity(seq.size_hint().unwrap_or(16));

        while let Some(value) = seq.next_element()? {
            values.push(value);
        }

        Ok(StringPool::with_strings(&values))
    }
}

#[cfg(feature = "enable-serde")]
impl<'de> Deserialize<'de> for StringPool {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(StringPoolVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_deduplicates() {
        let mut pool = StringPool::new();
        let a = pool.insert("x");
        let b = pool.insert("y");
        let c = pool.insert("x");

        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(pool.len(), 2);
        assert_eq!(&pool[a], "x");
        assert_eq!(pool.get(b), Some("y"));
    }

    #[cfg(feature = "enable-serde")]
    #[test]
    fn serde_preserves_indices() {
        use serde_test::{assert_ser_tokens, Token};

        let mut pool = StringPool::new();
        let main = pool.insert("main.swift");
        let x = pool.insert("x");

        assert_ser_tokens(
            &pool,
            &[
                Token::Seq { len: Some(2) },
                Token::Str("main.swift"),
                Token::Str("x"),
                Token::SeqEnd,
            ],
        );

        let json = serde_json::to_string(&pool).unwrap();
        let back: StringPool = serde_json::from_str(&json).unwrap();

        assert_eq!(&back[main], "main.swift");
        assert_eq!(&back[x], "x");
    }
}
