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

//! Data set generators for relation attributes.
//!
//! The generators fill attribute columns following a random distribution.
//! Each generator owns its random number generator. Generators created with
//! `with_seed` produce the same columns on every run, which tests rely on.

use crate::error::{ErrorKind, Result};

use num_traits::FromPrimitive;

use std::convert::TryFrom;
use std::ops::RangeInclusive;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use zipf::ZipfDistribution;

/// A type that can be used as a key attribute.
pub trait KeyAttribute: Sized + Clone {
    /// The key that never matches a primary key.
    fn null_key() -> Self;
    fn try_from_usize(x: usize) -> Result<Self>;
}

impl KeyAttribute for i32 {
    fn null_key() -> Self {
        -1
    }

    fn try_from_usize(x: usize) -> Result<Self> {
        Self::try_from(x).map_err(|_| {
            ErrorKind::IntegerOverflow(format!("Failed to convert {} from usize", x)).into()
        })
    }
}

impl KeyAttribute for i64 {
    fn null_key() -> Self {
        -1
    }

    fn try_from_usize(x: usize) -> Result<Self> {
        Self::try_from(x).map_err(|_| {
            ErrorKind::IntegerOverflow(format!("Failed to convert {} from usize", x)).into()
        })
    }
}

/// String keys are zero-padded, so they sort in the same order as their
/// numeric counterparts.
impl KeyAttribute for String {
    fn null_key() -> Self {
        String::new()
    }

    fn try_from_usize(x: usize) -> Result<Self> {
        Ok(format!("k{:010}", x))
    }
}

fn check_selectivity(selectivity: Option<u32>) -> Result<u32> {
    let selectivity = selectivity.unwrap_or(100);
    if selectivity > 100 {
        Err(ErrorKind::InvalidArgument(format!(
            "Selectivity must be a percentage, got {}",
            selectivity
        ))
        .into())
    } else {
        Ok(selectivity)
    }
}

/// Generator for relations with uniform distribution.
pub struct UniformRelation {
    rng: StdRng,
}

impl UniformRelation {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a generator with a reproducible sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a primary key attribute.
    ///
    /// The generated keys are unique and contiguous. The key range starts from
    /// 1 and ends at, i.e. including, attr.len(). Keys are placed at random
    /// locations within the slice.
    ///
    /// `selectivity` specifies the join selectivity in percent. An according
    /// percentage of keys are set to the `NULL` value. By default (`None`), the
    /// selectivity is 100%. Note that `NULL` keys are not unique.
    pub fn gen_primary_key<T: KeyAttribute>(
        &mut self,
        attr: &mut [T],
        selectivity: Option<u32>,
    ) -> Result<()> {
        let selectivity = check_selectivity(selectivity)?;
        let percent = Uniform::from(1..=100);

        attr.iter_mut()
            .zip(1..)
            .map(|(x, i)| {
                T::try_from_usize(i).map(|i| {
                    *x = if percent.sample(&mut self.rng) <= selectivity {
                        i
                    } else {
                        T::null_key()
                    };
                })
            })
            .collect::<Result<()>>()?;

        attr.shuffle(&mut self.rng);
        Ok(())
    }

    /// Generates a foreign key attribute based on a primary key attribute.
    ///
    /// The generated keys are sampled from the primary key attribute, that is,
    /// they follow a foreign-key relationship. If the primary keys are unique,
    /// then the generated foreign keys follow a uniform distribution.
    pub fn gen_foreign_key_from_primary_key<T: Clone>(
        &mut self,
        fk_attr: &mut [T],
        pk_attr: &[T],
    ) -> Result<()> {
        if pk_attr.is_empty() && !fk_attr.is_empty() {
            return Err(ErrorKind::InvalidArgument(
                "Foreign keys require a non-empty primary key attribute".to_string(),
            )
            .into());
        }

        fk_attr
            .iter_mut()
            .zip(pk_attr.iter().cycle())
            .for_each(|(fk, pk)| *fk = pk.clone());
        fk_attr.shuffle(&mut self.rng);
        Ok(())
    }

    /// Generates a uniformly distributed attribute.
    ///
    /// The generated values are sampled from `range`.
    pub fn gen_attr<T: FromPrimitive>(
        &mut self,
        attr: &mut [T],
        range: RangeInclusive<usize>,
    ) -> Result<()> {
        if range.is_empty() {
            return Err(ErrorKind::InvalidArgument(format!(
                "Empty value range {:?}",
                range
            ))
            .into());
        }

        let between = Uniform::from(range);

        attr.iter_mut()
            .map(|x| {
                FromPrimitive::from_usize(between.sample(&mut self.rng))
                    .ok_or_else(|| {
                        ErrorKind::IntegerOverflow("Failed to convert from usize".to_string())
                            .into()
                    })
                    .map(|r| *x = r)
            })
            .collect::<Result<()>>()
    }

    /// Generates `len` keys with values from 1 to `len`, in random order.
    pub fn primary_key<T: KeyAttribute>(&mut self, len: usize) -> Result<Vec<T>> {
        let mut attr = vec![T::null_key(); len];
        self.gen_primary_key(&mut attr, None)?;
        Ok(attr)
    }

    /// Generates `len` foreign keys that reference `pk_attr`.
    pub fn foreign_key<T: KeyAttribute>(&mut self, len: usize, pk_attr: &[T]) -> Result<Vec<T>> {
        let mut attr = vec![T::null_key(); len];
        self.gen_foreign_key_from_primary_key(&mut attr, pk_attr)?;
        Ok(attr)
    }

    /// Generates `len` values sampled uniformly from `range`.
    pub fn attr<T: FromPrimitive + Default + Clone>(
        &mut self,
        len: usize,
        range: RangeInclusive<usize>,
    ) -> Result<Vec<T>> {
        let mut attr = vec![T::default(); len];
        self.gen_attr(&mut attr, range)?;
        Ok(attr)
    }
}

impl Default for UniformRelation {
    fn default() -> Self {
        Self::new()
    }
}

/// Generator for relations with Zipf distribution.
///
/// Skewed attributes produce many duplicate join keys, which exercises the
/// multi-match paths of join operators.
pub struct ZipfRelation {
    rng: StdRng,
}

impl ZipfRelation {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates an attribute following the Zipf distribution.
    ///
    /// The generated values are sampled from 1 to num_elements (inclusive).
    /// Note that the exponent must be greather than 0.
    ///
    /// In the literature, num_elements is also called the alphabet size.
    pub fn gen_attr<T: FromPrimitive>(
        &mut self,
        attr: &mut [T],
        num_elements: usize,
        exponent: f64,
    ) -> Result<()> {
        let between = ZipfDistribution::new(num_elements, exponent).map_err(|_| {
            ErrorKind::InvalidArgument(
                "ZipfDistribution requires num_elements and exponent greater than 0".to_string(),
            )
        })?;

        attr.iter_mut()
            .map(|x| {
                FromPrimitive::from_usize(between.sample(&mut self.rng))
                    .ok_or_else(|| {
                        ErrorKind::IntegerOverflow("Failed to convert from usize".to_string())
                            .into()
                    })
                    .map(|r| *x = r)
            })
            .collect::<Result<()>>()
    }
}

impl Default for ZipfRelation {
    fn default() -> Self {
        Self::new()
    }
}
