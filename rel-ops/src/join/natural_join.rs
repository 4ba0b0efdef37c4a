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

use super::disambiguate;
use super::hash_join::HashTable;
use crate::error::{ErrorKind, Result};
use crate::relation::Relation;
use crate::tuple::{self, Tuple};
use tracing::debug;

impl Relation {
    /// Joins `self` and `other` on all attributes with the same name.
    ///
    /// The result holds one copy of each common attribute, followed by the
    /// remaining attributes of `other`. Its key is the key of `self` plus
    /// the key attributes of `other` that are not common. Without common
    /// attributes, the result is the cartesian product.
    pub fn natural_join(&self, other: &Relation) -> Result<Relation> {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for (c1, attr) in self.attributes().iter().enumerate() {
            if let Some(c2) = other.col(attr) {
                if self.domains()[c1] != other.domains()[c2] {
                    return Err(ErrorKind::SchemaMismatch(format!(
                        "Common attribute {} is a {} in {}, but a {} in {}",
                        attr,
                        self.domains()[c1],
                        self.name(),
                        other.domains()[c2],
                        other.name()
                    ))
                    .into());
                }
                left.push(c1);
                right.push(c2);
            }
        }

        let kept: Vec<usize> = (0..other.arity()).filter(|c| !right.contains(c)).collect();
        let kept_names = disambiguate(
            self.attributes(),
            kept.iter().map(|&c| &other.attributes()[c]),
        );

        let table = HashTable::build(other.tuples(), &right);
        let mut rows: Vec<Tuple> = Vec::new();
        for t1 in self.tuples() {
            for t2 in table.probe(t1, &left) {
                rows.push(tuple::concat(t1, &tuple::extract(t2, &kept)));
            }
        }

        let mut key = self.key().to_vec();
        for (&c, name) in kept.iter().zip(&kept_names) {
            if other.key().contains(&other.attributes()[c]) {
                key.push(name.clone());
            }
        }

        let attributes = self
            .attributes()
            .iter()
            .cloned()
            .chain(kept_names)
            .collect();
        let domains = self
            .domains()
            .iter()
            .copied()
            .chain(kept.iter().map(|&c| other.domains()[c]))
            .collect();

        let result = self.derive(attributes, domains, key, rows);
        debug!(
            left = %self.name(),
            right = %other.name(),
            common = left.len(),
            result = %result.name(),
            rows = result.len(),
            "RA> natural join"
        );
        Ok(result)
    }
}
