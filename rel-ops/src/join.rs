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

//! Join operators.
//!
//! Equi-joins match the attributes `attrs1` of the left relation pairwise
//! against the attributes `attrs2` of the right relation. The result schema
//! is the left schema followed by the right schema. Right attribute names
//! that collide with a left name, ignoring case, are suffixed with "2".
//!
//! Three equi-join strategies exist, see `JoinAlgorithm`. For the same
//! inputs, they return the same tuples in the same order, provided that the
//! index join's preconditions hold.

mod hash_join;
mod index_join;
mod join_algorithm;
mod natural_join;
mod nested_loop_join;

pub use join_algorithm::JoinAlgorithm;

use crate::domain::Domain;
use crate::error::{ErrorKind, Result};
use crate::relation::{split_attrs, Relation};
use crate::tuple::Tuple;

impl Relation {
    /// Joins `self` with `other` on `attrs1 = attrs2` using `algorithm`.
    pub fn equi_join(
        &self,
        algorithm: JoinAlgorithm,
        attrs1: &str,
        attrs2: &str,
        other: &Relation,
    ) -> Result<Relation> {
        match algorithm {
            JoinAlgorithm::NestedLoop => self.join(attrs1, attrs2, other),
            JoinAlgorithm::Index => self.i_join(attrs1, attrs2, other),
            JoinAlgorithm::Hash => self.h_join(attrs1, attrs2, other),
        }
    }
}

/// Positions of the join attributes in the left and right relation.
#[derive(Debug)]
pub(crate) struct JoinColumns {
    pub(crate) left: Vec<usize>,
    pub(crate) right: Vec<usize>,
}

/// Resolves and validates the join attributes of an equi-join.
pub(crate) fn join_columns(
    r1: &Relation,
    attrs1: &str,
    r2: &Relation,
    attrs2: &str,
) -> Result<JoinColumns> {
    let attrs1 = split_attrs(attrs1);
    let attrs2 = split_attrs(attrs2);

    if attrs1.len() != attrs2.len() {
        return Err(ErrorKind::SchemaMismatch(format!(
            "Join of {} and {} compares {} with {} attributes",
            r1.name(),
            r2.name(),
            attrs1.len(),
            attrs2.len()
        ))
        .into());
    }

    let left = r1.match_attrs(&attrs1)?;
    let right = r2.match_attrs(&attrs2)?;

    for (&c1, &c2) in left.iter().zip(right.iter()) {
        let (d1, d2) = (r1.domains()[c1], r2.domains()[c2]);
        if d1 != d2 {
            return Err(ErrorKind::SchemaMismatch(format!(
                "Cannot join {}.{} ({}) with {}.{} ({})",
                r1.name(),
                r1.attributes()[c1],
                d1,
                r2.name(),
                r2.attributes()[c2],
                d2
            ))
            .into());
        }
    }

    Ok(JoinColumns { left, right })
}

/// Renames the attributes in `right` that collide with an attribute in
/// `left`, ignoring case, by appending "2" until the name is unique.
pub(crate) fn disambiguate<'a, I>(left: &[String], right: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut taken: Vec<String> = left.to_vec();
    let mut renamed = Vec::new();

    for attr in right {
        let mut name = attr.clone();
        while taken.iter().any(|t| t.eq_ignore_ascii_case(&name)) {
            name.push('2');
        }
        taken.push(name.clone());
        renamed.push(name);
    }

    renamed
}

/// Builds the result of an equi-join. The result keeps the key of `r1`.
pub(crate) fn equi_join_result(r1: &Relation, r2: &Relation, rows: Vec<Tuple>) -> Relation {
    let attributes = r1
        .attributes()
        .iter()
        .cloned()
        .chain(disambiguate(r1.attributes(), r2.attributes()))
        .collect();
    let domains: Vec<Domain> = r1
        .domains()
        .iter()
        .chain(r2.domains().iter())
        .copied()
        .collect();

    r1.derive(attributes, domains, r1.key().to_vec(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn colliding_names_get_suffix() {
        let left = strings(&["title", "year", "studioNo"]);
        let right = strings(&["name", "STUDIONO"]);
        assert_eq!(disambiguate(&left, &right), strings(&["name", "STUDIONO2"]));
    }

    #[test]
    fn suffix_repeats_until_unique() {
        let left = strings(&["a", "a2"]);
        let right = strings(&["A", "b"]);
        assert_eq!(disambiguate(&left, &right), strings(&["A22", "b"]));
    }
}
