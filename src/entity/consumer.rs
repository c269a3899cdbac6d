//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::entity::{EntityError, EntityInfo};
use crate::utility::SaHashMap;
use std::convert::Infallible;

/// Something that entities are handed to once they have been built.
///
/// Ownership moves into the consumer, the producer keeps nothing.
pub trait EntityConsumer {
    /// The error produced when an entity is refused.
    type Error;

    /// Takes ownership of `info`.
    fn accept(&mut self, info: EntityInfo) -> Result<(), Self::Error>;
}

impl EntityConsumer for Vec<EntityInfo> {
    type Error = Infallible;

    fn accept(&mut self, info: EntityInfo) -> Result<(), Self::Error> {
        self.push(info);

        Ok(())
    }
}

/// A consumer that keeps entities in arrival order and indexes them by name.
#[derive(Debug, Default)]
pub struct EntityTable {
    entities: Vec<EntityInfo>,
    by_name: SaHashMap<String, usize>,
}

impl EntityTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an entity by its function name.
    pub fn get(&self, name: &str) -> Option<&EntityInfo> {
        self.by_name.get(name).map(|i| &self.entities[*i])
    }

    /// Number of entities in the table.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Checks if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Every entity, in the order it was accepted.
    pub fn iter(&self) -> impl Iterator<Item = &EntityInfo> + ExactSizeIterator {
        self.entities.iter()
    }

    /// Gives up the table, returning the entities in the order they were accepted.
    pub fn into_entities(self) -> Vec<EntityInfo> {
        self.entities
    }
}

impl EntityConsumer for EntityTable {
    type Error = EntityError;

    fn accept(&mut self, info: EntityInfo) -> Result<(), Self::Error> {
        if self.by_name.contains_key(info.function_name()) {
            return Err(EntityError::DuplicateName(info.function_name().to_owned()));
        }

        self.by_name
            .insert(info.function_name().to_owned(), self.entities.len());
        self.entities.push(info);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityParts;

    fn named(name: &str) -> EntityInfo {
        EntityInfo::new(EntityParts {
            function_name: name.into(),
            return_type: "Void".into(),
            ..EntityParts::default()
        })
        .unwrap()
    }

    #[test]
    fn table_keeps_arrival_order() {
        let mut table = EntityTable::new();

        for name in ["main", "helper", "init"] {
            table.accept(named(name)).unwrap();
        }

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.iter().map(|e| e.function_name()).collect::<Vec<_>>(),
            ["main", "helper", "init"]
        );
        assert_eq!(table.get("helper").unwrap().function_name(), "helper");
        assert!(table.get("missing").is_none());
    }

    #[test]
    fn table_rejects_duplicates() {
        let mut table = EntityTable::new();

        table.accept(named("f")).unwrap();

        assert_eq!(
            table.accept(named("f")),
            Err(EntityError::DuplicateName("f".into()))
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn vec_accepts_anything() {
        let mut entities = Vec::new();

        entities.accept(named("f")).unwrap();
        entities.accept(named("f")).unwrap();

        assert_eq!(entities.len(), 2);
    }
}
