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

use rel_ops::error::ErrorKind;
use rel_ops::{tuple, Domain, IndexKey, IndexKind, NameSeq, Relation, Value};
use std::error::Error;
use std::result::Result;

fn movie(index_kind: IndexKind, names: &NameSeq) -> Result<Relation, Box<dyn Error>> {
    let mut movie = Relation::parse(
        "movie",
        "title year studioNo",
        "String Integer Integer",
        "title",
        index_kind,
        names,
    )?;
    movie.insert(tuple!["Star_Wars", 1977, 12345])?;
    movie.insert(tuple!["Jaws", 1975, 12345])?;
    Ok(movie)
}

#[test]
fn project_title_and_year() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let movie = movie(IndexKind::LinHashMap, &names)?;

    let projected = movie.project("title year")?;
    assert_eq!(projected.attributes(), ["title", "year"]);
    assert_eq!(projected.domains(), [Domain::String, Domain::Integer]);
    assert_eq!(projected.key(), ["title"]);
    assert_eq!(
        projected.tuples(),
        [tuple!["Star_Wars", 1977], tuple!["Jaws", 1975]]
    );
    Ok(())
}

#[test]
fn project_without_key_uses_all_attributes_as_key() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let movie = movie(IndexKind::TreeMap, &names)?;

    let studios = movie.project("studioNo")?;
    assert_eq!(studios.key(), ["studioNo"]);
    assert_eq!(studios.len(), 2);

    let distinct = movie.project_distinct("studioNo")?;
    assert_eq!(distinct.tuples(), [tuple![12345]]);
    Ok(())
}

#[test]
fn project_unknown_attribute_fails() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let movie = movie(IndexKind::NoMap, &names)?;

    let err = movie.project("title budget").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::AttributeNotFound(_)));

    let err = movie.project("   ").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument(_)));
    Ok(())
}

#[test]
fn project_rejects_repeated_attribute() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let movie = movie(IndexKind::LinHashMap, &names)?;

    for attrs in &["year year", "title year title"] {
        let err = movie.project(attrs).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::SchemaMismatch(_)));
        let err = movie.project_distinct(attrs).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::SchemaMismatch(_)));
    }
    Ok(())
}

#[test]
fn select_by_predicate() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let movie = movie(IndexKind::NoMap, &names)?;

    let selected = movie.select(|t| t[1] == Value::Integer(1977));
    assert_eq!(selected.tuples(), [tuple!["Star_Wars", 1977, 12345]]);
    assert_eq!(selected.attributes(), movie.attributes());
    assert_eq!(movie.len(), 2);
    Ok(())
}

#[test]
fn select_by_key() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    for &kind in &[IndexKind::TreeMap, IndexKind::LinHashMap] {
        let movie = movie(kind, &names)?;

        let hit = movie.select_key(&IndexKey::single(Value::from("Jaws")))?;
        assert_eq!(hit.tuples(), [tuple!["Jaws", 1975, 12345]]);

        let miss = movie.select_key(&IndexKey::single(Value::from("Alien")))?;
        assert!(miss.is_empty());
    }
    Ok(())
}

#[test]
fn select_by_key_requires_index() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let movie = movie(IndexKind::NoMap, &names)?;

    assert!(!movie.has_index());
    let err = movie
        .select_key(&IndexKey::single(Value::from("Jaws")))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::IndexUnavailable(_)));
    Ok(())
}

#[test]
fn derived_relations_are_indexed() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let movie = movie(IndexKind::LinHashMap, &names)?;

    let old = movie.select(|t| t[1] < Value::Integer(1976));
    assert_eq!(old.index_kind(), IndexKind::LinHashMap);
    assert_eq!(old.index_entries().count(), 1);

    let hit = old.select_key(&IndexKey::single(Value::from("Jaws")))?;
    assert_eq!(hit.len(), 1);
    Ok(())
}

#[test]
fn insert_rejects_invalid_tuples() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let mut movie = movie(IndexKind::LinHashMap, &names)?;

    let err = movie.insert(tuple!["Alien", 1979]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TupleValidation(_)));

    let err = movie.insert(tuple!["Alien", 1979_i64, 12345]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TupleValidation(_)));

    assert_eq!(movie.len(), 2);
    assert_eq!(movie.index_entries().count(), 2);
    Ok(())
}

#[test]
fn duplicate_key_replaces_index_entry() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let mut movie = movie(IndexKind::LinHashMap, &names)?;

    movie.insert(tuple!["Jaws", 1976, 54321])?;
    assert_eq!(movie.len(), 3);
    assert_eq!(movie.index_entries().count(), 2);

    let hit = movie.select_key(&IndexKey::single(Value::from("Jaws")))?;
    assert_eq!(hit.tuples(), [tuple!["Jaws", 1976, 54321]]);
    Ok(())
}

#[test]
fn schema_is_validated() {
    let names = NameSeq::new();

    let err = Relation::parse("r", "a b", "Integer", "a", IndexKind::NoMap, &names).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::SchemaMismatch(_)));

    let err = Relation::parse("r", "a a", "Integer Long", "a", IndexKind::NoMap, &names)
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::SchemaMismatch(_)));

    let err = Relation::parse("r", "a b", "Integer Long", "c", IndexKind::NoMap, &names)
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::AttributeNotFound(_)));

    let err = Relation::parse("r", "a b", "Integer Long", "", IndexKind::NoMap, &names)
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument(_)));

    let err = Relation::parse("r", "a", "Date", "a", IndexKind::NoMap, &names).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument(_)));
}

#[test]
fn col_finds_positions() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let movie = movie(IndexKind::NoMap, &names)?;

    assert_eq!(movie.col("title"), Some(0));
    assert_eq!(movie.col("studioNo"), Some(2));
    assert_eq!(movie.col("Title"), None);
    Ok(())
}

#[test]
fn derived_names_draw_from_sequence() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let movie = movie(IndexKind::NoMap, &names)?;

    let first = movie.project("title")?;
    let second = first.select(|_| true);
    assert_eq!(first.name(), "movie0");
    assert_eq!(second.name(), "movie01");
    assert!(second.names().shares_counter(&names));
    Ok(())
}

#[test]
fn display_prints_every_tuple() -> Result<(), Box<dyn Error>> {
    let names = NameSeq::new();
    let movie = movie(IndexKind::NoMap, &names)?;

    let printed = movie.to_string();
    assert!(printed.starts_with("Relation movie"));
    assert!(printed.contains("Star_Wars"));
    assert!(printed.contains("Jaws"));
    assert_eq!(printed.lines().count(), 7);
    Ok(())
}
