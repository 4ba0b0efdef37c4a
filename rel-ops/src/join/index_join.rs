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

use super::{equi_join_result, join_columns};
use crate::error::{ErrorKind, Result};
use crate::index::IndexKey;
use crate::relation::{split_attrs, Relation};
use crate::tuple;
use linhash::KeyType;
use tracing::debug;

/// Orders the left join columns so that they line up with the right
/// relation's primary key.
///
/// Fails if `attrs2` is not a permutation of `key`.
fn probe_columns(attrs2: &[&str], key: &[String], left: &[usize]) -> Option<Vec<usize>> {
    let mut sorted_attrs: Vec<&str> = attrs2.to_vec();
    let mut sorted_key: Vec<&str> = key.iter().map(String::as_str).collect();
    sorted_attrs.sort_unstable();
    sorted_key.sort_unstable();

    if KeyType::new(sorted_attrs) != KeyType::new(sorted_key) {
        return None;
    }

    key.iter()
        .map(|k| attrs2.iter().position(|a| *a == k.as_str()).map(|j| left[j]))
        .collect()
}

impl Relation {
    /// Joins `self` and `other` on `attrs1 = attrs2` by looking up each
    /// tuple of `self` in the index of `other`.
    ///
    /// `attrs2` must name exactly the primary key of `other`, in any order,
    /// and `other` must have an index. Otherwise, the join fails with
    /// `IndexUnavailable`.
    pub fn i_join(&self, attrs1: &str, attrs2: &str, other: &Relation) -> Result<Relation> {
        let cols = join_columns(self, attrs1, other, attrs2)?;

        let index = other.index().ok_or_else(|| {
            ErrorKind::IndexUnavailable(format!("Relation {} has no index", other.name()))
        })?;
        let probe_cols = probe_columns(&split_attrs(attrs2), other.key(), &cols.left)
            .ok_or_else(|| {
                ErrorKind::IndexUnavailable(format!(
                    "Attributes '{}' are not the primary key of {}",
                    attrs2,
                    other.name()
                ))
            })?;

        let rows = self
            .tuples()
            .iter()
            .filter_map(|t1| {
                let key = IndexKey::new(tuple::extract(t1, &probe_cols));
                index.get(&key).map(|t2| tuple::concat(t1, t2))
            })
            .collect();

        let result = equi_join_result(self, other, rows);
        debug!(
            left = %self.name(),
            right = %other.name(),
            attrs1,
            attrs2,
            result = %result.name(),
            rows = result.len(),
            "RA> index join"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::probe_columns;

    #[test]
    fn probe_columns_follow_key_order() {
        let key = vec!["b".to_string(), "a".to_string()];
        assert_eq!(probe_columns(&["a", "b"], &key, &[7, 9]), Some(vec![9, 7]));
        assert_eq!(probe_columns(&["a"], &key, &[7]), None);
        assert_eq!(probe_columns(&["a", "c"], &key, &[7, 9]), None);
    }
}
