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

//! Names of derived relations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A sequence of numbers that names derived relations.
///
/// The caller creates a sequence per session and passes it to relation
/// constructors. Every relation derived from an operand draws from the
/// operand's sequence, so names are unique within a session. Clones share
/// the same counter.
#[derive(Clone, Debug, Default)]
pub struct NameSeq {
    next: Arc<AtomicUsize>,
}

impl NameSeq {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `base` suffixed with the next number of the sequence.
    pub fn next_name(&self, base: &str) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", base, n)
    }

    /// The number the next derived relation will get.
    pub fn peek(&self) -> usize {
        self.next.load(Ordering::Relaxed)
    }

    /// Whether both handles draw from the same counter.
    pub fn shares_counter(&self, other: &NameSeq) -> bool {
        Arc::ptr_eq(&self.next, &other.next)
    }
}
