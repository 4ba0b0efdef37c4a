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

//! # The Relational Operator Library
//!
//! `rel-ops` is a collection of relational algebra operators over in-memory,
//! schema-typed relations. Currently it includes the operators:
//!
//! - Projection (with and without duplicate elimination)
//! - Selection (by predicate and by primary key)
//! - Union and set difference
//! - Equi-join (nested-loop, index, and hash)
//! - Natural join
//!
//! # Relations
//!
//! A `Relation` stores `Tuple`s that are type checked against its schema on
//! insert. Each attribute has a `Domain`, and each tuple holds one `Value`
//! per attribute. Operators never modify their operands; they return a new
//! relation named after the operand and a number drawn from a `NameSeq`.
//!
//! # Indexes
//!
//! A relation optionally maintains an index on its primary key. The index
//! structure is chosen with `IndexKind` at construction:
//!
//! - `NoMap`: no index, key-based selection and index joins fail
//! - `TreeMap`: an ordered B-tree map
//! - `LinHashMap`: a linear hashing map from the `linhash` crate
//!
//! Derived relations inherit the index kind of their left operand.
//!
//! # Example
//!
//! ```
//! use rel_ops::{tuple, IndexKey, IndexKind, NameSeq, Relation, Value};
//!
//! let names = NameSeq::new();
//! let mut movie = Relation::parse(
//!     "movie",
//!     "title year length genre studioName producerNo",
//!     "String Integer Integer String String Integer",
//!     "title year",
//!     IndexKind::LinHashMap,
//!     &names,
//! )
//! .unwrap();
//!
//! movie.insert(tuple!["Star_Wars", 1977, 124, "sciFi", "Fox", 12345]).unwrap();
//! movie.insert(tuple!["Star_Wars_2", 1980, 124, "sciFi", "Fox", 12345]).unwrap();
//!
//! let key = IndexKey::new(vec![Value::from("Star_Wars"), Value::from(1977)]);
//! assert_eq!(movie.select_key(&key).unwrap().len(), 1);
//! assert_eq!(movie.project("title year").unwrap().len(), 2);
//! ```

pub mod domain;
pub mod error;
pub mod index;
pub mod join;
pub mod naming;
pub mod relation;
pub mod tuple;

pub use domain::{Domain, Value};
pub use index::{IndexKey, IndexKind, TupleIndex};
pub use join::JoinAlgorithm;
pub use linhash::KeyType;
pub use naming::NameSeq;
pub use relation::Relation;
pub use tuple::Tuple;
