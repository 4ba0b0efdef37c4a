// Copyright 2023 The rel-ops Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Primary key indexes.
//!
//! An index maps the primary key of a tuple to the tuple. The index
//! structure is chosen per relation with `IndexKind`. All structures are
//! used through the `TupleIndex` trait.

use crate::domain::Value;
use crate::tuple::Tuple;
use linhash::{KeyType, LinHashMap};
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The key of an index entry: the primary key values of a tuple.
pub type IndexKey = KeyType<Value>;

/// Specifies the index structure of a relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    /// No index.
    ///
    /// Key-based selection and index joins fail with `IndexUnavailable`.
    NoMap,

    /// Ordered index backed by `BTreeMap`. There is no separate B+-tree kind.
    TreeMap,

    /// Hashed index backed by linear hashing.
    LinHashMap,
}

impl IndexKind {
    /// Creates an empty index of this kind.
    pub fn make_index(self) -> Option<Box<dyn TupleIndex>> {
        match self {
            IndexKind::NoMap => None,
            IndexKind::TreeMap => Some(Box::new(BTreeMap::<IndexKey, Tuple>::new())),
            IndexKind::LinHashMap => Some(Box::new(LinHashMap::<IndexKey, Tuple>::new())),
        }
    }
}

impl Default for IndexKind {
    fn default() -> Self {
        IndexKind::LinHashMap
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexKind::NoMap => "NoMap",
            IndexKind::TreeMap => "TreeMap",
            IndexKind::LinHashMap => "LinHashMap",
        };
        f.write_str(name)
    }
}

/// A uniform lookup and insert interface over index structures.
pub trait TupleIndex: fmt::Debug {
    fn get(&self, key: &IndexKey) -> Option<&Tuple>;

    /// Inserts or replaces the entry for `key` and returns the previous tuple.
    fn put(&mut self, key: IndexKey, tuple: Tuple) -> Option<Tuple>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a IndexKey, &'a Tuple)> + 'a>;
}

impl TupleIndex for BTreeMap<IndexKey, Tuple> {
    fn get(&self, key: &IndexKey) -> Option<&Tuple> {
        BTreeMap::get(self, key)
    }

    fn put(&mut self, key: IndexKey, tuple: Tuple) -> Option<Tuple> {
        self.insert(key, tuple)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a IndexKey, &'a Tuple)> + 'a> {
        Box::new(self.iter())
    }
}

impl TupleIndex for LinHashMap<IndexKey, Tuple> {
    fn get(&self, key: &IndexKey) -> Option<&Tuple> {
        LinHashMap::get(self, key)
    }

    fn put(&mut self, key: IndexKey, tuple: Tuple) -> Option<Tuple> {
        LinHashMap::put(self, key, tuple)
    }

    fn len(&self) -> usize {
        LinHashMap::len(self)
    }

    fn entries<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a IndexKey, &'a Tuple)> + 'a> {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple;

    #[test]
    fn every_kind_supports_put_and_get() {
        for kind in &[IndexKind::TreeMap, IndexKind::LinHashMap] {
            let mut index = kind.make_index().unwrap();
            let key = IndexKey::single(Value::from("Jaws"));

            assert!(index.put(key.clone(), tuple!["Jaws", 1975]).is_none());
            let old = index.put(key.clone(), tuple!["Jaws", 1976]);

            assert_eq!(old, Some(tuple!["Jaws", 1975]));
            assert_eq!(index.get(&key), Some(&tuple!["Jaws", 1976]));
            assert_eq!(index.len(), 1);
            assert_eq!(index.entries().count(), 1);
        }
    }

    #[test]
    fn no_map_has_no_index() {
        assert!(IndexKind::NoMap.make_index().is_none());
    }

    #[test]
    fn ordered_kind_is_tree_map() {
        let names: Vec<_> = [IndexKind::NoMap, IndexKind::TreeMap, IndexKind::LinHashMap]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, ["NoMap", "TreeMap", "LinHashMap"]);
        assert!(format!("{:?}", IndexKind::TreeMap.make_index().unwrap()).starts_with('{'));
    }
}
