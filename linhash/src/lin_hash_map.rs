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

//! A hash map that grows by linear hashing.
//!
//! See the crate documentation for an overview of the algorithm.
//!
//! All addressing goes through `chain_of`, which applies the split pointer
//! redirection. Lookups and inserts therefore always agree on the chain
//! that holds a key, regardless of how far the current split pass has
//! progressed.

use crate::bucket::Chain;
use crate::{DEFAULT_INITIAL_CHAINS, DEFAULT_LOAD_THRESHOLD, SLOTS};
use rustc_hash::FxHasher;
use std::borrow::Borrow;
use std::cell::Cell;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};
use std::iter::FromIterator;
use std::mem;
use tracing::{debug, trace};

/// Growth parameters of a `LinHashMap`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinHashConfig {
    /// Number of home chains of the new map (`mod1`). At least 1.
    pub initial_chains: usize,

    /// Upper bound on `keys / (SLOTS * chains)`.
    pub load_threshold: f64,
}

impl Default for LinHashConfig {
    fn default() -> Self {
        Self {
            initial_chains: DEFAULT_INITIAL_CHAINS,
            load_threshold: DEFAULT_LOAD_THRESHOLD,
        }
    }
}

impl LinHashConfig {
    pub fn initial_chains(mut self, initial_chains: usize) -> Self {
        self.initial_chains = initial_chains;
        self
    }

    pub fn load_threshold(mut self, load_threshold: f64) -> Self {
        self.load_threshold = load_threshold;
        self
    }
}

/// A map from `K` to `V` that uses the Linear Hashing algorithm.
///
/// The hash table is an expandable array of bucket chains. The map never
/// rehashes all keys at once; each split moves the keys of exactly one
/// chain.
pub struct LinHashMap<K, V, S = BuildHasherDefault<FxHasher>> {
    h_table: Vec<Chain<K, V>>,
    mod1: usize,
    mod2: usize,
    isplit: usize,
    key_count: usize,
    load_threshold: f64,
    splits: usize,
    buckets_accessed: Cell<usize>,
    hash_builder: S,
}

impl<K: Hash + Eq, V> LinHashMap<K, V> {
    /// Creates a map with `DEFAULT_INITIAL_CHAINS` home chains.
    pub fn new() -> Self {
        Self::with_config(LinHashConfig::default())
    }

    pub fn with_config(config: LinHashConfig) -> Self {
        Self::with_config_and_hasher(config, BuildHasherDefault::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LinHashMap<K, V, S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_config_and_hasher(LinHashConfig::default(), hash_builder)
    }

    pub fn with_config_and_hasher(config: LinHashConfig, hash_builder: S) -> Self {
        let mod1 = config.initial_chains.max(1);

        Self {
            h_table: (0..mod1).map(|_| Chain::new()).collect(),
            mod1,
            mod2: 2 * mod1,
            isplit: 0,
            key_count: 0,
            load_threshold: config.load_threshold,
            splits: 0,
            buckets_accessed: Cell::new(0),
            hash_builder,
        }
    }

    /// Returns the value stored for `key`.
    ///
    /// Every bucket inspected on the way is counted in `buckets_accessed`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let i = self.chain_of(key);
        let (value, inspected) = self.h_table[i].find(key);
        self.buckets_accessed
            .set(self.buckets_accessed.get() + inspected);
        value
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let i = self.chain_of(key);
        self.h_table[i].find_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let i = self.chain_of(key);
        self.h_table[i].find(key).0.is_some()
    }

    /// Inserts the pair, or replaces the value if `key` is already present.
    ///
    /// Returns the previous value. Replacing a value doesn't change the
    /// number of keys and thus never splits. A new key that pushes the load
    /// factor over the threshold splits chain `isplit` before the key is
    /// stored. At most one split happens per call.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let i = self.chain_of(&key);
        if let Some(old) = self.h_table[i].find_mut(&key) {
            trace!(chain = i, "put: replacing value of existing key");
            return Some(mem::replace(old, value));
        }

        self.key_count += 1;
        let load_factor = self.load_factor();
        trace!(chain = i, load_factor, "put: new key");

        if load_factor > self.load_threshold {
            self.split();
        }

        // The split may have moved the key's home chain
        let i = self.chain_of(&key);
        self.h_table[i].push(key, value);
        None
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.key_count
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Number of chains, always `mod1 + isplit`.
    pub fn chain_count(&self) -> usize {
        self.h_table.len()
    }

    /// Number of buckets in chain `i`, including the home bucket.
    pub fn chain_len(&self, i: usize) -> Option<usize> {
        self.h_table.get(i).map(Chain::buckets)
    }

    /// Slot capacity of the home buckets, `SLOTS * (mod1 + isplit)`.
    pub fn capacity(&self) -> usize {
        SLOTS * (self.mod1 + self.isplit)
    }

    pub fn load_factor(&self) -> f64 {
        self.key_count as f64 / self.capacity() as f64
    }

    pub fn mod1(&self) -> usize {
        self.mod1
    }

    pub fn mod2(&self) -> usize {
        self.mod2
    }

    pub fn isplit(&self) -> usize {
        self.isplit
    }

    /// Number of splits performed since the map was created.
    pub fn split_count(&self) -> usize {
        self.splits
    }

    /// Number of buckets inspected by `get` so far.
    pub fn buckets_accessed(&self) -> usize {
        self.buckets_accessed.get()
    }

    pub fn reset_buckets_accessed(&self) {
        self.buckets_accessed.set(0);
    }

    /// Iterates over all pairs in chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.h_table.iter().flat_map(Chain::iter)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    fn hash<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        let mut hasher = self.hash_builder.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// Low resolution hash function.
    fn h(&self, hash: u64) -> usize {
        (hash % self.mod1 as u64) as usize
    }

    /// High resolution hash function.
    fn h2(&self, hash: u64) -> usize {
        (hash % self.mod2 as u64) as usize
    }

    /// Resolves the chain that holds `key`.
    fn chain_of<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        let hash = self.hash(key);
        let i = self.h(hash);
        if i < self.isplit {
            self.h2(hash)
        } else {
            i
        }
    }

    /// Splits the chain at `isplit`.
    ///
    /// The drained pairs land either in the fresh chain at `isplit` or in the
    /// chain appended at `isplit + mod1`.
    fn split(&mut self) {
        let split_chain = self.isplit;
        self.h_table.push(Chain::new());
        let drained = mem::replace(&mut self.h_table[split_chain], Chain::new());

        let mut moved = 0;
        for (key, value) in drained.drain() {
            let i = self.h2(self.hash(&key));
            debug_assert!(i == split_chain || i == split_chain + self.mod1);
            if i != split_chain {
                moved += 1;
            }
            self.h_table[i].push(key, value);
        }

        self.splits += 1;
        self.isplit += 1;
        if self.isplit == self.mod1 {
            self.mod1 *= 2;
            self.mod2 = 2 * self.mod1;
            self.isplit = 0;
        }

        debug!(
            split_chain,
            new_chain = self.h_table.len() - 1,
            moved,
            mod1 = self.mod1,
            isplit = self.isplit,
            "split bucket chain"
        );
        debug_assert_eq!(self.h_table.len(), self.mod1 + self.isplit);
    }
}

impl<K: Hash + Eq, V> Default for LinHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Extend<(K, V)> for LinHashMap<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for LinHashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for LinHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.h_table.iter().flat_map(Chain::iter))
            .finish()
    }
}

impl<K: fmt::Display, V, S> fmt::Display for LinHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LinHashMap")?;
        writeln!(f, "-------------------------------------------")?;
        for (i, chain) in self.h_table.iter().enumerate() {
            write!(f, "Bucket [ {} ] = ", i)?;
            for (j, bucket) in chain.bucket_iter().enumerate() {
                if j > 0 {
                    write!(f, " --> ")?;
                }
                write!(f, "{}", bucket)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "-------------------------------------------")
    }
}
