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

//! Tuples.
//!
//! A tuple is immutable once created. Relations share tuples by reference
//! counting, so deriving a relation never copies attribute values unless
//! the operator builds new tuples (projection and joins).

use crate::domain::Value;
use std::sync::Arc;

/// An ordered sequence of attribute values.
pub type Tuple = Arc<[Value]>;

/// Builds a tuple from values that convert into `Value`.
///
/// ```
/// use rel_ops::{tuple, Value};
///
/// let t = tuple!["Star_Wars", 1977, 12345];
/// assert_eq!(t[1], Value::Integer(1977));
/// ```
#[macro_export]
macro_rules! tuple {
    ($($value:expr),* $(,)?) => {
        {
            let values: ::std::vec::Vec<$crate::Value> = vec![$($crate::Value::from($value)),*];
            $crate::Tuple::from(values)
        }
    };
}

/// Concatenates two tuples into a wider tuple.
pub fn concat(t1: &[Value], t2: &[Value]) -> Tuple {
    t1.iter().chain(t2.iter()).cloned().collect()
}

/// Extracts the values at `positions`, in the order of `positions`.
pub fn extract(t: &[Value], positions: &[usize]) -> Vec<Value> {
    positions.iter().map(|&p| t[p].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_and_extract() {
        let t1 = crate::tuple!["Jaws", 1975];
        let t2 = crate::tuple![12345];
        let t = concat(&t1, &t2);

        assert_eq!(t.len(), 3);
        assert_eq!(extract(&t, &[2, 0]), vec![Value::from(12345), Value::from("Jaws")]);
    }
}
