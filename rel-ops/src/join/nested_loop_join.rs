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
use crate::domain::Value;
use crate::error::Result;
use crate::relation::Relation;
use crate::tuple;
use tracing::debug;

fn matches(t1: &[Value], cols1: &[usize], t2: &[Value], cols2: &[usize]) -> bool {
    cols1.iter().zip(cols2).all(|(&c1, &c2)| t1[c1] == t2[c2])
}

impl Relation {
    /// Joins `self` and `other` on `attrs1 = attrs2` by comparing every pair
    /// of tuples.
    ///
    /// ```
    /// use rel_ops::{tuple, IndexKind, NameSeq, Relation};
    ///
    /// let names = NameSeq::new();
    /// let mut movie = Relation::parse(
    ///     "movie", "title studioNo", "String Integer", "title", IndexKind::NoMap, &names,
    /// )
    /// .unwrap();
    /// let mut studio = Relation::parse(
    ///     "studio", "name studioNo", "String Integer", "studioNo", IndexKind::NoMap, &names,
    /// )
    /// .unwrap();
    /// movie.insert(tuple!["Star_Wars", 12345]).unwrap();
    /// studio.insert(tuple!["Fox", 12345]).unwrap();
    ///
    /// let joined = movie.join("studioNo", "studioNo", &studio).unwrap();
    /// assert_eq!(joined.attributes(), ["title", "studioNo", "name", "studioNo2"]);
    /// assert_eq!(joined.len(), 1);
    /// ```
    pub fn join(&self, attrs1: &str, attrs2: &str, other: &Relation) -> Result<Relation> {
        let cols = join_columns(self, attrs1, other, attrs2)?;

        let mut rows = Vec::new();
        for t1 in self.tuples() {
            for t2 in other.tuples() {
                if matches(t1, &cols.left, t2, &cols.right) {
                    rows.push(tuple::concat(t1, t2));
                }
            }
        }

        let result = equi_join_result(self, other, rows);
        debug!(
            left = %self.name(),
            right = %other.name(),
            attrs1,
            attrs2,
            result = %result.name(),
            rows = result.len(),
            "RA> nested-loop join"
        );
        Ok(result)
    }
}
