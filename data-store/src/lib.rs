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

//! Durable snapshots of relations.
//!
//! A `Store` saves each relation to its own file in a directory, and loads
//! it back with the same schema, index kind, and tuples.

pub mod error;
pub mod snapshot;

pub use snapshot::{Store, StoreBuilder};
