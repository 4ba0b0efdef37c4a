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

use data_store::error::ErrorKind;
use data_store::StoreBuilder;
use datagen::relation::UniformRelation;
use rel_ops::{tuple, IndexKey, IndexKind, NameSeq, Relation, Value};
use std::error::Error;
use std::fs;
use std::result::Result;

fn movie(names: &NameSeq) -> Result<Relation, Box<dyn Error>> {
    let mut movie = Relation::parse(
        "movie",
        "title year length rating genre",
        "String Integer Short Double Character",
        "title year",
        IndexKind::LinHashMap,
        names,
    )?;
    movie.insert(tuple!["Star_Wars", 1977, 124_i16, 8.6, 'S'])?;
    movie.insert(tuple!["Jaws", 1975, 124_i16, 8.1, 'T'])?;
    movie.insert(tuple!["Airplane, the \"movie\"", 1980, 88_i16, -0.5, 'C'])?;
    movie.insert(tuple!["", 2000, 0_i16, f64::INFINITY, ','])?;
    Ok(movie)
}

#[test]
fn save_then_load_restores_relation() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let names = NameSeq::new();
    let movie = movie(&names)?;

    for &compress in &[false, true] {
        let store = StoreBuilder::default()
            .directory(dir.path())
            .compress(compress)
            .build()?;

        let path = store.save(&movie)?;
        assert_eq!(path, store.path("movie"));
        assert!(store.exists("movie"));

        let loaded = store.load("movie", &names)?;
        assert_eq!(loaded.name(), movie.name());
        assert_eq!(loaded.attributes(), movie.attributes());
        assert_eq!(loaded.domains(), movie.domains());
        assert_eq!(loaded.key(), movie.key());
        assert_eq!(loaded.index_kind(), movie.index_kind());
        assert_eq!(loaded.tuples(), movie.tuples());

        let key = IndexKey::new(vec![Value::from("Jaws"), Value::from(1975)]);
        assert_eq!(loaded.select_key(&key)?.len(), 1);
    }
    Ok(())
}

#[test]
fn save_replaces_previous_snapshot() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let names = NameSeq::new();
    let store = StoreBuilder::default()
        .directory(dir.path())
        .extension("tsv")
        .delimiter(b'\t')
        .build()?;

    let mut movie = movie(&names)?;
    store.save(&movie)?;
    movie.insert(tuple!["Alien", 1979, 117_i16, 8.5, 'H'])?;
    store.save(&movie)?;

    assert_eq!(store.load("movie", &names)?.len(), 5);

    let leftovers: Vec<_> = fs::read_dir(dir.path())?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<Result<_, _>>()?;
    assert_eq!(leftovers, vec![std::ffi::OsString::from("movie.tsv")]);
    Ok(())
}

#[test]
fn large_generated_relation_round_trips() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let names = NameSeq::new();
    let store = StoreBuilder::default()
        .directory(dir.path())
        .compress(true)
        .build()?;

    let mut gen = UniformRelation::with_seed(11);
    let keys: Vec<i64> = gen.primary_key(2000)?;
    let payload: Vec<i32> = gen.attr(2000, 1..=100)?;

    let mut orders = Relation::parse(
        "orders",
        "id amount",
        "Long Integer",
        "id",
        IndexKind::TreeMap,
        &names,
    )?;
    for (&k, &p) in keys.iter().zip(payload.iter()) {
        orders.insert(tuple![k, p])?;
    }

    store.save(&orders)?;
    let loaded = store.load("orders", &names)?;
    assert_eq!(loaded.tuples(), orders.tuples());
    assert_eq!(loaded.index_entries().count(), 2000);
    Ok(())
}

#[test]
fn missing_snapshot_is_io_error() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let store = StoreBuilder::default().directory(dir.path()).build()?;

    assert!(!store.exists("nothing"));
    let err = store.load("nothing", &NameSeq::new()).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::IoError(_)));

    let err = store.remove("nothing").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::IoError(_)));
    Ok(())
}

#[test]
fn malformed_snapshots_are_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let names = NameSeq::new();
    let store = StoreBuilder::default().directory(dir.path()).build()?;

    fs::write(store.path("empty"), "")?;
    let err = store.load("empty", &names).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::FormatError(_)));

    fs::write(store.path("other"), "movie,NoMap,1\ntitle\nString\ntitle\n")?;
    let err = store.load("other", &names).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::FormatError(_)));

    fs::write(store.path("short"), "short,NoMap,2\na,b\nInteger,Integer\na\n1\n")?;
    let err = store.load("short", &names).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::FormatError(_)));

    fs::write(store.path("typed"), "typed,NoMap,1\na\nInteger\na\nnope\n")?;
    let err = store.load("typed", &names).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::RelOpsError(_)));

    fs::write(store.path("kind"), "kind,BPlusTree,1\na\nInteger\na\n")?;
    let err = store.load("kind", &names).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::CsvError(_)));
    Ok(())
}

#[test]
fn remove_deletes_snapshot() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let names = NameSeq::new();
    let store = StoreBuilder::default().directory(dir.path()).build()?;

    store.save(&movie(&names)?)?;
    store.remove("movie")?;
    assert!(!store.exists("movie"));
    Ok(())
}
