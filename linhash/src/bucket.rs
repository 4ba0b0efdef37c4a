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

//! Buckets and bucket chains.
//!
//! A chain is a home bucket followed by zero or more overflow buckets. The
//! buckets of a chain are owned by a vector in insertion order, instead of
//! being linked by pointers. Walking the vector from front to back visits
//! the buckets in the same order as following the overflow links would.

use crate::SLOTS;
use std::fmt;

/// A fixed-capacity, unordered array of key-value slots.
#[derive(Clone, Debug)]
pub struct Bucket<K, V> {
    slots: Vec<(K, V)>,
}

impl<K, V> Bucket<K, V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(SLOTS),
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= SLOTS
    }

    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.slots
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.slots
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Stores the pair in the next free slot.
    ///
    /// Returns the pair back if the bucket is full.
    pub fn add(&mut self, key: K, value: V) -> Result<(), (K, V)> {
        if self.is_full() {
            return Err((key, value));
        }
        self.slots.push((key, value));
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots.iter().map(|(k, v)| (k, v))
    }
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A home bucket and its overflow buckets.
#[derive(Clone, Debug)]
pub struct Chain<K, V> {
    buckets: Vec<Bucket<K, V>>,
}

impl<K, V> Chain<K, V> {
    /// Creates a chain that consists of a single empty home bucket.
    pub fn new() -> Self {
        Self {
            buckets: vec![Bucket::new()],
        }
    }

    /// Number of buckets, including the home bucket.
    pub fn buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored pairs across all buckets of the chain.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Bucket::is_empty)
    }

    /// Looks up `key` and reports how many buckets were inspected.
    pub fn find<Q>(&self, key: &Q) -> (Option<&V>, usize)
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut inspected = 0;
        for bucket in &self.buckets {
            inspected += 1;
            if let Some(v) = bucket.find(key) {
                return (Some(v), inspected);
            }
        }
        (None, inspected)
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.buckets.iter_mut().find_map(|b| b.find_mut(key))
    }

    /// Appends the pair to the first bucket with a free slot. If every bucket
    /// is full, a new overflow bucket is appended to the end of the chain.
    pub fn push(&mut self, key: K, value: V) {
        let (key, value) = match self.buckets.iter_mut().find(|b| !b.is_full()) {
            Some(bucket) => match bucket.add(key, value) {
                Ok(()) => return,
                Err(pair) => pair,
            },
            None => (key, value),
        };

        let mut overflow = Bucket::new();
        overflow.slots.push((key, value));
        self.buckets.push(overflow);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flat_map(Bucket::iter)
    }

    pub fn bucket_iter(&self) -> impl Iterator<Item = &Bucket<K, V>> {
        self.buckets.iter()
    }

    /// Consumes the chain and yields every stored pair in chain order.
    pub fn drain(self) -> impl Iterator<Item = (K, V)> {
        self.buckets.into_iter().flat_map(|b| b.slots.into_iter())
    }
}

impl<K, V> Default for Chain<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Display, V> fmt::Display for Bucket<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for (k, _) in &self.slots {
            write!(f, "{} . ", k)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_chain_grows_overflow_bucket() {
        let mut chain = Chain::new();
        for i in 0..SLOTS {
            chain.push(i, i * 10);
        }
        assert_eq!(chain.buckets(), 1);

        chain.push(SLOTS, 0);
        assert_eq!(chain.buckets(), 2);
        assert_eq!(chain.len(), SLOTS + 1);

        let (found, inspected) = chain.find(&SLOTS);
        assert_eq!(found, Some(&0));
        assert_eq!(inspected, 2);
    }

    #[test]
    fn drain_keeps_chain_order() {
        let mut chain = Chain::new();
        for i in 0..(2 * SLOTS + 1) {
            chain.push(i, ());
        }
        let keys: Vec<_> = chain.drain().map(|(k, _)| k).collect();
        assert_eq!(keys, (0..(2 * SLOTS + 1)).collect::<Vec<_>>());
    }

    #[test]
    fn add_rejects_when_full() {
        let mut bucket = Bucket::new();
        for i in 0..SLOTS {
            assert!(bucket.add(i, ()).is_ok());
        }
        assert_eq!(bucket.add(99, ()), Err((99, ())));
    }
}
