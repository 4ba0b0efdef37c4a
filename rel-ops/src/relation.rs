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

//! Relations and the unary and set operators of the relational algebra.
//!
//! A relation has a name, a schema (attribute names with their domains and
//! a primary key), a list of tuples, and optionally a primary key index.
//! Operators never modify their operands. Each operator returns a new
//! relation that draws its name from the operand's `NameSeq`.
//!
//! Attribute lists are passed as whitespace-separated names, e.g.,
//! `movie.project("title year")`.

use crate::domain::{Domain, Value};
use crate::error::{Error, ErrorKind, Result};
use crate::index::{IndexKey, IndexKind, TupleIndex};
use crate::naming::NameSeq;
use crate::tuple::{self, Tuple};
use rustc_hash::FxHashSet;
use std::fmt;
use tracing::{debug, trace};

/// Splits a whitespace-separated attribute list.
pub(crate) fn split_attrs(attrs: &str) -> Vec<&str> {
    attrs.split_whitespace().collect()
}

/// A named, schema-typed collection of tuples.
#[derive(Debug)]
pub struct Relation {
    name: String,
    attributes: Vec<String>,
    domains: Vec<Domain>,
    key: Vec<String>,
    key_positions: Vec<usize>,
    tuples: Vec<Tuple>,
    index_kind: IndexKind,
    index: Option<Box<dyn TupleIndex>>,
    names: NameSeq,
}

impl Relation {
    /// Creates an empty relation.
    ///
    /// `attributes` and `domains` must have the same length, attribute names
    /// must be unique, and `key` must be a non-empty list of attributes.
    pub fn new<N: Into<String>>(
        name: N,
        attributes: Vec<String>,
        domains: Vec<Domain>,
        key: Vec<String>,
        index_kind: IndexKind,
        names: &NameSeq,
    ) -> Result<Self> {
        let name = name.into();

        if attributes.len() != domains.len() {
            return Err(ErrorKind::SchemaMismatch(format!(
                "Relation {} has {} attributes, but {} domains",
                name,
                attributes.len(),
                domains.len()
            ))
            .into());
        }

        let mut seen = FxHashSet::default();
        if let Some(dup) = attributes.iter().find(|a| !seen.insert(a.as_str())) {
            return Err(ErrorKind::SchemaMismatch(format!(
                "Relation {} has duplicate attribute {}",
                name, dup
            ))
            .into());
        }

        if key.is_empty() {
            return Err(ErrorKind::InvalidArgument(format!(
                "Relation {} requires a primary key",
                name
            ))
            .into());
        }

        let key_positions = positions(&name, &attributes, key.iter().map(String::as_str))?;

        debug!(
            relation = %name,
            attributes = %attributes.join(" "),
            key = %key.join(" "),
            index = %index_kind,
            "DDL> create relation"
        );

        Ok(Self {
            name,
            attributes,
            domains,
            key,
            key_positions,
            tuples: Vec::new(),
            index_kind,
            index: index_kind.make_index(),
            names: names.clone(),
        })
    }

    /// Creates an empty relation from whitespace-separated attribute names,
    /// domain names, and key attribute names.
    ///
    /// ```
    /// use rel_ops::{IndexKind, NameSeq, Relation};
    ///
    /// let names = NameSeq::new();
    /// let movie = Relation::parse(
    ///     "movie",
    ///     "title year studioNo",
    ///     "String Integer Integer",
    ///     "title",
    ///     IndexKind::LinHashMap,
    ///     &names,
    /// )
    /// .unwrap();
    /// assert_eq!(movie.col("year"), Some(1));
    /// ```
    pub fn parse(
        name: &str,
        attributes: &str,
        domains: &str,
        key: &str,
        index_kind: IndexKind,
        names: &NameSeq,
    ) -> Result<Self> {
        let to_owned = |s: &str| s.split_whitespace().map(String::from).collect::<Vec<_>>();

        Self::new(
            name,
            to_owned(attributes),
            Domain::parse_list(domains)?,
            to_owned(key),
            index_kind,
            names,
        )
    }

    /// Builds a relation from operator output.
    ///
    /// The schema is derived from valid schemas and the tuples come from
    /// valid relations, thus nothing is checked again. The result inherits
    /// the index kind and the name sequence of `self`.
    pub(crate) fn derive(
        &self,
        attributes: Vec<String>,
        domains: Vec<Domain>,
        key: Vec<String>,
        tuples: Vec<Tuple>,
    ) -> Relation {
        let key_positions = key
            .iter()
            .filter_map(|k| attributes.iter().position(|a| a == k))
            .collect();

        let mut result = Relation {
            name: self.names.next_name(&self.name),
            attributes,
            domains,
            key,
            key_positions,
            tuples: Vec::with_capacity(tuples.len()),
            index_kind: self.index_kind,
            index: self.index_kind.make_index(),
            names: self.names.clone(),
        };

        for t in tuples {
            result.store(t);
        }
        result
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn key(&self) -> &[String] {
        &self.key
    }

    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.attributes.len()
    }

    pub fn index_kind(&self) -> IndexKind {
        self.index_kind
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    pub(crate) fn index(&self) -> Option<&dyn TupleIndex> {
        self.index.as_deref()
    }

    pub fn names(&self) -> &NameSeq {
        &self.names
    }

    /// Iterates over the index entries, if the relation has an index.
    pub fn index_entries(&self) -> impl Iterator<Item = (&IndexKey, &Tuple)> {
        self.index.iter().flat_map(|index| index.entries())
    }

    /// Returns the position of attribute `attr`.
    pub fn col(&self, attr: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == attr)
    }

    /// Returns the positions of the attributes in `attrs`, in order.
    pub(crate) fn match_attrs(&self, attrs: &[&str]) -> Result<Vec<usize>> {
        positions(&self.name, &self.attributes, attrs.iter().copied())
    }

    /// Inserts a tuple.
    ///
    /// The tuple must have one value per attribute, and each value must
    /// belong to its attribute's domain. On failure, the relation remains
    /// unchanged. If the relation has an index, the tuple replaces any
    /// index entry with the same primary key. The replaced tuple stays in
    /// the relation.
    pub fn insert<T: Into<Tuple>>(&mut self, tuple: T) -> Result<()> {
        let tuple = tuple.into();
        trace!(
            relation = %self.name,
            tuple = %DisplayTuple(&tuple),
            "DML> insert"
        );

        self.type_check(&tuple)?;
        self.store(tuple);
        Ok(())
    }

    fn type_check(&self, t: &[Value]) -> Result<()> {
        if t.len() != self.domains.len() {
            return Err(ErrorKind::TupleValidation(format!(
                "Relation {} expects {} values, got {}",
                self.name,
                self.domains.len(),
                t.len()
            ))
            .into());
        }

        for ((value, domain), attr) in t.iter().zip(&self.domains).zip(&self.attributes) {
            if !domain.admits(value) {
                return Err(ErrorKind::TupleValidation(format!(
                    "Value {} of attribute {}.{} is a {}, expected {}",
                    value,
                    self.name,
                    attr,
                    value.domain(),
                    domain
                ))
                .into());
            }
        }

        Ok(())
    }

    fn store(&mut self, tuple: Tuple) {
        if let Some(index) = self.index.as_mut() {
            let key = IndexKey::new(tuple::extract(&tuple, &self.key_positions));
            index.put(key, tuple.clone());
        }
        self.tuples.push(tuple);
    }

    /// Projects the tuples onto the attributes in `attributes`.
    ///
    /// The result keeps the primary key if it is contained in the projected
    /// attributes. Otherwise, all projected attributes form the key. Duplicate
    /// tuples are retained; see `project_distinct`.
    pub fn project(&self, attributes: &str) -> Result<Relation> {
        self.project_impl(attributes, false)
    }

    /// Same as `project`, but removes duplicate tuples from the result.
    pub fn project_distinct(&self, attributes: &str) -> Result<Relation> {
        self.project_impl(attributes, true)
    }

    fn project_impl(&self, attributes: &str, distinct: bool) -> Result<Relation> {
        let attrs = split_attrs(attributes);
        if attrs.is_empty() {
            return Err(ErrorKind::InvalidArgument(format!(
                "Projection of {} requires at least one attribute",
                self.name
            ))
            .into());
        }

        let mut seen_attrs = FxHashSet::default();
        if let Some(dup) = attrs.iter().find(|a| !seen_attrs.insert(**a)) {
            return Err(ErrorKind::SchemaMismatch(format!(
                "Projection of {} repeats attribute {}",
                self.name, dup
            ))
            .into());
        }

        let cols = self.match_attrs(&attrs)?;
        let domains = cols.iter().map(|&c| self.domains[c]).collect();
        let key = if self.key.iter().all(|k| attrs.contains(&k.as_str())) {
            self.key.clone()
        } else {
            attrs.iter().map(|a| a.to_string()).collect()
        };

        let mut seen = FxHashSet::default();
        let rows: Vec<Tuple> = self
            .tuples
            .iter()
            .map(|t| Tuple::from(tuple::extract(t, &cols)))
            .filter(|t| !distinct || seen.insert(t.clone()))
            .collect();

        let result = self.derive(
            attrs.iter().map(|a| a.to_string()).collect(),
            domains,
            key,
            rows,
        );
        debug!(
            relation = %self.name,
            attributes,
            distinct,
            result = %result.name,
            rows = result.len(),
            "RA> project"
        );
        Ok(result)
    }

    /// Selects the tuples that satisfy `predicate`.
    ///
    /// ```
    /// use rel_ops::{tuple, IndexKind, NameSeq, Relation, Value};
    ///
    /// let names = NameSeq::new();
    /// let mut movie = Relation::parse(
    ///     "movie", "title year", "String Integer", "title", IndexKind::NoMap, &names,
    /// )
    /// .unwrap();
    /// movie.insert(tuple!["Star_Wars", 1977]).unwrap();
    /// movie.insert(tuple!["Jaws", 1975]).unwrap();
    ///
    /// let year = movie.col("year").unwrap();
    /// let old = movie.select(|t| t[year] == Value::Integer(1977));
    /// assert_eq!(old.len(), 1);
    /// ```
    pub fn select<P>(&self, predicate: P) -> Relation
    where
        P: Fn(&[Value]) -> bool,
    {
        let rows = self
            .tuples
            .iter()
            .filter(|t| predicate(&t[..]))
            .cloned()
            .collect();

        let result = self.derive(
            self.attributes.clone(),
            self.domains.clone(),
            self.key.clone(),
            rows,
        );
        debug!(
            relation = %self.name,
            result = %result.name,
            rows = result.len(),
            "RA> select"
        );
        result
    }

    /// Selects the tuple whose primary key equals `key_val` with an index
    /// lookup.
    ///
    /// Fails with `IndexUnavailable` if the relation has no index.
    pub fn select_key(&self, key_val: &IndexKey) -> Result<Relation> {
        let index = self.index().ok_or_else(|| {
            ErrorKind::IndexUnavailable(format!("Relation {} has no index", self.name))
        })?;

        let rows = index.get(key_val).cloned().into_iter().collect();
        let result = self.derive(
            self.attributes.clone(),
            self.domains.clone(),
            self.key.clone(),
            rows,
        );
        debug!(
            relation = %self.name,
            key = %key_val,
            result = %result.name,
            rows = result.len(),
            "RA> select by key"
        );
        Ok(result)
    }

    /// Checks whether both relations have the same number of attributes, each
    /// with the same corresponding domain.
    pub fn compatible(&self, other: &Relation) -> Result<()> {
        if self.domains.len() != other.domains.len() {
            return Err(ErrorKind::SchemaMismatch(format!(
                "Relations {} and {} have different arity",
                self.name, other.name
            ))
            .into());
        }

        if let Some(j) = (0..self.domains.len()).find(|&j| self.domains[j] != other.domains[j]) {
            return Err(ErrorKind::SchemaMismatch(format!(
                "Relations {} and {} disagree on domain {}",
                self.name, other.name, j
            ))
            .into());
        }

        Ok(())
    }

    /// Unions the tuples of both relations.
    ///
    /// The result contains every tuple of `self`, followed by the tuples of
    /// `other` that don't already appear in it. Tuples are compared by value.
    pub fn union(&self, other: &Relation) -> Result<Relation> {
        self.compatible(other)?;

        let mut seen: FxHashSet<&[Value]> = self.tuples.iter().map(|t| &t[..]).collect();
        let rows = self
            .tuples
            .iter()
            .chain(other.tuples.iter().filter(|t| seen.insert(&t[..])))
            .cloned()
            .collect();

        let result = self.derive(
            self.attributes.clone(),
            self.domains.clone(),
            self.key.clone(),
            rows,
        );
        debug!(
            relation = %self.name,
            other = %other.name,
            result = %result.name,
            rows = result.len(),
            "RA> union"
        );
        Ok(result)
    }

    /// Returns the tuples of `self` that don't appear in `other`.
    ///
    /// Tuples are compared by value.
    pub fn minus(&self, other: &Relation) -> Result<Relation> {
        self.compatible(other)?;

        let exclude: FxHashSet<&[Value]> = other.tuples.iter().map(|t| &t[..]).collect();
        let rows = self
            .tuples
            .iter()
            .filter(|t| !exclude.contains(&t[..]))
            .cloned()
            .collect();

        let result = self.derive(
            self.attributes.clone(),
            self.domains.clone(),
            self.key.clone(),
            rows,
        );
        debug!(
            relation = %self.name,
            other = %other.name,
            result = %result.name,
            rows = result.len(),
            "RA> minus"
        );
        Ok(result)
    }
}

/// Resolves attribute names to their positions in `attributes`.
fn positions<'a, I>(relation: &str, attributes: &[String], attrs: I) -> Result<Vec<usize>>
where
    I: IntoIterator<Item = &'a str>,
{
    attrs
        .into_iter()
        .map(|attr| {
            attributes.iter().position(|a| a == attr).ok_or_else(|| {
                Error::from(ErrorKind::AttributeNotFound(format!(
                    "Attribute {} not found in relation {}",
                    attr, relation
                )))
            })
        })
        .collect()
}

pub(crate) struct DisplayTuple<'a>(pub(crate) &'a [Value]);

impl fmt::Display for DisplayTuple<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

const COLUMN_WIDTH: usize = 15;

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = format!("|-{}-|", "-".repeat(COLUMN_WIDTH * self.arity()));

        writeln!(f, "Relation {}", self.name)?;
        writeln!(f, "{}", rule)?;
        write!(f, "| ")?;
        for a in &self.attributes {
            write!(f, "{:>width$}", a, width = COLUMN_WIDTH)?;
        }
        writeln!(f, " |")?;
        writeln!(f, "{}", rule)?;
        for t in &self.tuples {
            write!(f, "| ")?;
            for v in t.iter() {
                write!(f, "{:>width$}", v.to_string(), width = COLUMN_WIDTH)?;
            }
            writeln!(f, " |")?;
        }
        writeln!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_report_missing_attribute() {
        let attributes = vec!["a".to_string(), "b".to_string()];
        assert_eq!(positions("r", &attributes, vec!["b", "a"]).unwrap(), vec![1, 0]);

        let err = positions("r", &attributes, vec!["c"]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::AttributeNotFound(_)));
    }

    #[test]
    fn split_attrs_ignores_extra_whitespace() {
        assert_eq!(split_attrs("  title   year "), vec!["title", "year"]);
    }

    #[test]
    fn display_tuple() {
        let t = crate::tuple!["Jaws", 1975, 'T'];
        assert_eq!(DisplayTuple(&t).to_string(), "(Jaws, 1975, T)");
    }
}
