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

//! Definitions of equi-join algorithms.

use crate::error::{Error, ErrorKind};
use std::fmt;
use std::str::FromStr;

/// Specifies the algorithm of an equi-join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JoinAlgorithm {
    /// Nested-loop join.
    ///
    /// Compares every pair of tuples. Makes no assumptions about the join
    /// attributes. Runs in O(|R| * |S|).
    NestedLoop,

    /// Index join.
    ///
    /// Probes the primary key index of the right relation once per left
    /// tuple. Requires that the right join attributes are exactly the right
    /// relation's primary key, and that the right relation has an index.
    Index,

    /// Hash join.
    ///
    /// Builds a hash table on the right join attributes, then probes it once
    /// per left tuple. The right join attributes need not be unique.
    Hash,
}

impl fmt::Display for JoinAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinAlgorithm::NestedLoop => "nested_loop",
            JoinAlgorithm::Index => "index",
            JoinAlgorithm::Hash => "hash",
        };
        f.write_str(name)
    }
}

impl FromStr for JoinAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nested_loop" => Ok(JoinAlgorithm::NestedLoop),
            "index" => Ok(JoinAlgorithm::Index),
            "hash" => Ok(JoinAlgorithm::Hash),
            _ => Err(ErrorKind::InvalidArgument(format!("Unknown join algorithm '{}'", s)).into()),
        }
    }
}
