//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Drives translation of whole units, one function at a time.
//!
//! A function that fails to translate never takes the rest of its unit down
//! with it, it is reported as a [`TranslationFailure`] and the next function
//! is translated as normal.

use crate::entity::{EntityConsumer, EntityInfo};
use crate::lower::lower;
use crate::transfer::RawEntityInfo;
use std::convert::Infallible;
use thiserror::Error;

pub use crate::lower::TranslateError;

impl From<Infallible> for TranslateError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

/// A single function that could not be translated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("translation failed for function {function}: {error}")]
pub struct TranslationFailure {
    /// The name of the function that failed
    pub function: String,
    /// Why it failed
    #[source]
    pub error: TranslateError,
}

/// The result of translating every function in a unit.
#[derive(Debug, Default)]
pub struct UnitTranslation {
    /// Every function that translated, in the order they were given
    pub entities: Vec<EntityInfo>,
    /// Every function that did not, in the order they were given
    pub failures: Vec<TranslationFailure>,
}

impl UnitTranslation {
    /// Checks if every function in the unit translated.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Translates a single function into an entity.
///
/// The result owns copies of everything it needs, `raw` can be changed or
/// dropped afterwards without affecting it.
pub fn translate(raw: &RawEntityInfo) -> Result<EntityInfo, TranslateError> {
    let parts = lower(raw)?;

    Ok(EntityInfo::new(parts)?)
}

/// Translates a single function, reporting a failure with the function it
/// happened in attached.
pub fn translate_function(raw: &RawEntityInfo) -> Result<EntityInfo, TranslationFailure> {
    translate(raw).map_err(|error| failure(raw, error))
}

/// Translates every function in `raws`, collecting the successes and failures
/// separately.
pub fn translate_unit<'a>(raws: impl IntoIterator<Item = &'a RawEntityInfo>) -> UnitTranslation {
    let mut unit = UnitTranslation::default();

    for raw in raws {
        match translate_function(raw) {
            Ok(info) => unit.entities.push(info),
            Err(failure) => unit.failures.push(failure),
        }
    }

    unit
}

/// Translates every function in `raws` and hands each entity to `consumer`.
///
/// An entity that the consumer refuses is reported as a failure just like
/// one that did not translate.
pub fn translate_into<'a, C>(
    raws: impl IntoIterator<Item = &'a RawEntityInfo>,
    consumer: &mut C,
) -> Vec<TranslationFailure>
where
    C: EntityConsumer,
    TranslateError: From<C::Error>,
{
    let mut failures = Vec::default();

    for raw in raws {
        let result = translate(raw).and_then(|info| Ok(consumer.accept(info)?));

        if let Err(error) = result {
            failures.push(failure(raw, error));
        }
    }

    failures
}

fn failure(raw: &RawEntityInfo, error: TranslateError) -> TranslationFailure {
    let failure = TranslationFailure {
        function: raw.function_name.clone(),
        error,
    };

    tracing::warn!(function = %failure.function, "{failure}");

    failure
}
