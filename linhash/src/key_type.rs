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

//! Composite keys.

use std::fmt;
use std::iter::FromIterator;

/// An ordered sequence of values that together form a key.
///
/// Two keys are equal iff all components are equal in order. Keys are
/// ordered lexicographically by their components, thus a `KeyType` can be
/// used in hashed as well as in ordered maps.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyType<T> {
    key: Vec<T>,
}

impl<T> KeyType<T> {
    pub fn new(key: Vec<T>) -> Self {
        Self { key }
    }

    /// A key with a single component.
    pub fn single(value: T) -> Self {
        Self { key: vec![value] }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.key
    }
}

impl<T> From<Vec<T>> for KeyType<T> {
    fn from(key: Vec<T>) -> Self {
        Self::new(key)
    }
}

impl<T: Clone> From<&[T]> for KeyType<T> {
    fn from(key: &[T]) -> Self {
        Self::new(key.to_vec())
    }
}

impl<T> FromIterator<T> for KeyType<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: fmt::Display> fmt::Display for KeyType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyType(")?;
        for (i, k) in self.key.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", k)?;
        }
        write!(f, ")")
    }
}
