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

use itertools::Itertools;
use proptest::prelude::*;
use rel_ops::error::ErrorKind;
use rel_ops::{tuple, IndexKind, NameSeq, Relation, Tuple};
use std::error::Error;
use std::result::Result;

fn pairs(name: &str, rows: &[(i64, char)], names: &NameSeq) -> Relation {
    let mut relation =
        Relation::parse(name, "id tag", "Long Character", "id tag", IndexKind::TreeMap, names)
            .unwrap();
    for &(id, tag) in rows {
        relation.insert(tuple![id, tag]).unwrap();
    }
    relation
}

#[test]
fn union_appends_new_tuples() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let a = pairs("a", &[(1, 'x'), (2, 'y')], &names);
    let b = pairs("b", &[(2, 'y'), (3, 'z')], &names);

    let u = a.union(&b)?;
    assert_eq!(u.tuples(), [tuple![1_i64, 'x'], tuple![2_i64, 'y'], tuple![3_i64, 'z']]);
    assert_eq!(u.key(), a.key());
    Ok(())
}

#[test]
fn minus_removes_common_tuples() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let a = pairs("a", &[(1, 'x'), (2, 'y')], &names);
    let b = pairs("b", &[(2, 'y'), (3, 'z')], &names);

    assert_eq!(a.minus(&b)?.tuples(), [tuple![1_i64, 'x']]);
    assert_eq!(b.minus(&a)?.tuples(), [tuple![3_i64, 'z']]);
    assert!(a.minus(&a)?.is_empty());
    Ok(())
}

#[test]
fn incompatible_relations_are_rejected() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let a = pairs("a", &[(1, 'x')], &names);
    let narrow = Relation::parse("n", "id", "Long", "id", IndexKind::NoMap, &names)?;
    let swapped = Relation::parse("s", "id tag", "Character Long", "id", IndexKind::NoMap, &names)?;

    for other in &[&narrow, &swapped] {
        let err = a.union(other).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::SchemaMismatch(_)));
        let err = a.minus(other).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::SchemaMismatch(_)));
    }
    Ok(())
}

fn rows_strategy() -> impl Strategy<Value = Vec<(i64, char)>> {
    prop::collection::hash_set((0_i64..20, prop::char::range('a', 'd')), 0..30)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn union_has_no_duplicates(rows_a in rows_strategy(), rows_b in rows_strategy()) {
        let names = NameSeq::new();
        let a = pairs("a", &rows_a, &names);
        let b = pairs("b", &rows_b, &names);

        let u = a.union(&b).unwrap();
        prop_assert!(u.len() <= a.len() + b.len());
        prop_assert_eq!(u.tuples().iter().unique().count(), u.len());
        prop_assert!(a.tuples().iter().all(|t| u.tuples().contains(t)));
        prop_assert!(b.tuples().iter().all(|t| u.tuples().contains(t)));
    }

    #[test]
    fn minus_excludes_other(rows_a in rows_strategy(), rows_b in rows_strategy()) {
        let names = NameSeq::new();
        let a = pairs("a", &rows_a, &names);
        let b = pairs("b", &rows_b, &names);

        let d = a.minus(&b).unwrap();
        prop_assert!(d.tuples().iter().all(|t| !b.tuples().contains(t)));

        let expected: Vec<&Tuple> = a
            .tuples()
            .iter()
            .filter(|t| !b.tuples().contains(t))
            .collect();
        prop_assert_eq!(d.tuples().iter().collect::<Vec<_>>(), expected);
    }
}
