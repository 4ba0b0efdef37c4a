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

//! # The Linear Hashing Library
//!
//! `linhash` provides a hash map that grows incrementally by linear hashing,
//! and the composite key type used to index relations.
//!
//! - `LinHashMap`: a map backed by an expandable array of bucket chains
//! - `KeyType`: an ordered, hashable composite key
//!
//! # Growth
//!
//! The map starts with `mod1` home chains. Keys are addressed with the low
//! resolution hash function `h(k) = hash(k) mod mod1`. Whenever the load
//! factor exceeds the threshold, exactly one chain is split: the chain at
//! position `isplit` is drained, a new chain is appended, and the drained
//! pairs are redistributed with the high resolution hash function
//! `h2(k) = hash(k) mod mod2`, where `mod2 = 2 * mod1`. Chains below
//! `isplit` have already been split in the current pass, so lookups that
//! land on them are redirected to `h2`.
//!
//! When `isplit` reaches `mod1`, the pass is complete. `mod1` doubles and
//! `isplit` starts over at zero. At all times the number of chains equals
//! `mod1 + isplit`.
//!
//! # Tuning parameters
//!
//! ## Slots
//!
//! `SLOTS` defines the number of key-value pairs that fit into one bucket.
//! A full bucket is extended with an overflow bucket at the end of its chain.
//!
//! ## Initial chains
//!
//! `DEFAULT_INITIAL_CHAINS` is the number of home chains a new map starts
//! with, i.e., the initial value of `mod1`.
//!
//! ## Load threshold
//!
//! `DEFAULT_LOAD_THRESHOLD` is the upper bound on the load factor
//! `keys / (SLOTS * chains)`. Crossing it triggers one split per insert.
//!
//! Both defaults can be overridden per map with `LinHashConfig`.

pub mod bucket;
pub mod key_type;
pub mod lin_hash_map;

pub use key_type::KeyType;
pub use lin_hash_map::{LinHashConfig, LinHashMap};

/// Number of key-value slots per bucket.
pub const SLOTS: usize = 4;

/// Number of home chains of a new map.
pub const DEFAULT_INITIAL_CHAINS: usize = 4;

/// Upper bound on the load factor before a chain is split.
pub const DEFAULT_LOAD_THRESHOLD: f64 = 1.2;
