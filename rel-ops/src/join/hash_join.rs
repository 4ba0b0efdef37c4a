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

//! Hash join.
//!
//! The join first builds a hash table on the join attributes of the right
//! relation. Each entry holds the chain of right tuples with the same join
//! attribute values, in the order of the right relation. Then, the join
//! probes the hash table with each left tuple.

use super::{equi_join_result, join_columns};
use crate::domain::Value;
use crate::error::Result;
use crate::relation::Relation;
use crate::tuple::{self, Tuple};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Hash table of the build side.
#[derive(Debug)]
pub(crate) struct HashTable<'a> {
    chains: FxHashMap<Vec<&'a Value>, Vec<&'a Tuple>>,
}

impl<'a> HashTable<'a> {
    /// Build a hash table on the columns `cols` of `tuples`.
    pub(crate) fn build(tuples: &'a [Tuple], cols: &[usize]) -> Self {
        let mut chains: FxHashMap<Vec<&'a Value>, Vec<&'a Tuple>> = FxHashMap::default();
        for t in tuples {
            let key = cols.iter().map(|&c| &t[c]).collect();
            chains.entry(key).or_default().push(t);
        }

        Self { chains }
    }

    /// Probe the hash table with the columns `cols` of `t`.
    pub(crate) fn probe(&self, t: &'a [Value], cols: &[usize]) -> &[&'a Tuple] {
        let key: Vec<&Value> = cols.iter().map(|&c| &t[c]).collect();
        self.chains
            .get(key.as_slice())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct keys.
    pub(crate) fn len(&self) -> usize {
        self.chains.len()
    }
}

impl Relation {
    /// Joins `self` and `other` on `attrs1 = attrs2` with a hash table built
    /// on `other`.
    ///
    /// Returns the same tuples in the same order as `join`.
    pub fn h_join(&self, attrs1: &str, attrs2: &str, other: &Relation) -> Result<Relation> {
        let cols = join_columns(self, attrs1, other, attrs2)?;

        let table = HashTable::build(other.tuples(), &cols.right);
        let mut rows = Vec::new();
        for t1 in self.tuples() {
            for t2 in table.probe(t1, &cols.left) {
                rows.push(tuple::concat(t1, t2));
            }
        }

        let result = equi_join_result(self, other, rows);
        debug!(
            left = %self.name(),
            right = %other.name(),
            attrs1,
            attrs2,
            distinct_keys = table.len(),
            result = %result.name(),
            rows = result.len(),
            "RA> hash join"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple;

    #[test]
    fn chains_keep_insertion_order() {
        let tuples = vec![tuple![1, 'a'], tuple![2, 'b'], tuple![1, 'c']];
        let table = HashTable::build(&tuples, &[0]);

        let probe = tuple![1];
        let chain: Vec<_> = table.probe(&probe, &[0]).iter().map(|t| t[1].clone()).collect();
        assert_eq!(chain, vec![Value::from('a'), Value::from('c')]);
        assert_eq!(table.len(), 2);

        let miss = tuple![3];
        assert!(table.probe(&miss, &[0]).is_empty());
    }
}
