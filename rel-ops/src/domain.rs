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

//! Attribute domains and attribute values.
//!
//! A domain is one of a small, closed set of semantic types. Every value
//! carries its domain in its variant, so type checking a tuple is a matter of
//! comparing variants position by position.

use crate::error::{ErrorKind, Result};
use serde_derive::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The semantic type of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    Character,
    String,
}

impl Domain {
    pub fn name(self) -> &'static str {
        match self {
            Domain::Long => "Long",
            Domain::Integer => "Integer",
            Domain::Short => "Short",
            Domain::Byte => "Byte",
            Domain::Double => "Double",
            Domain::Float => "Float",
            Domain::Character => "Character",
            Domain::String => "String",
        }
    }

    /// Whether `value` belongs to this domain.
    pub fn admits(self, value: &Value) -> bool {
        value.domain() == self
    }

    /// Parses the textual form of a value of this domain.
    ///
    /// The textual form is the one produced by `Value`'s `Display`
    /// implementation.
    pub fn parse_value(self, s: &str) -> Result<Value> {
        let value = match self {
            Domain::Long => Value::Long(s.parse().map_err(invalid(self, s))?),
            Domain::Integer => Value::Integer(s.parse().map_err(invalid(self, s))?),
            Domain::Short => Value::Short(s.parse().map_err(invalid(self, s))?),
            Domain::Byte => Value::Byte(s.parse().map_err(invalid(self, s))?),
            Domain::Double => Value::Double(s.parse().map_err(invalid(self, s))?),
            Domain::Float => Value::Float(s.parse().map_err(invalid(self, s))?),
            Domain::Character => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Value::Character(c),
                    _ => {
                        return Err(ErrorKind::TupleValidation(format!(
                            "'{}' is not a single character",
                            s
                        ))
                        .into())
                    }
                }
            }
            Domain::String => Value::String(s.to_string()),
        };

        Ok(value)
    }

    /// Resolves a whitespace-separated list of domain names.
    pub fn parse_list(domains: &str) -> Result<Vec<Domain>> {
        domains.split_whitespace().map(str::parse).collect()
    }
}

fn invalid<E>(domain: Domain, s: &str) -> impl FnOnce(E) -> ErrorKind + '_ {
    move |_| ErrorKind::TupleValidation(format!("'{}' is not a valid {} value", s, domain))
}

impl FromStr for Domain {
    type Err = crate::error::Error;

    /// Resolves a domain name, e.g., "Integer". Matching ignores case.
    fn from_str(s: &str) -> Result<Self> {
        let domain = match s.to_ascii_lowercase().as_str() {
            "long" => Domain::Long,
            "integer" | "int" => Domain::Integer,
            "short" => Domain::Short,
            "byte" => Domain::Byte,
            "double" => Domain::Double,
            "float" => Domain::Float,
            "character" | "char" => Domain::Character,
            "string" => Domain::String,
            _ => {
                return Err(
                    ErrorKind::InvalidArgument(format!("Unknown domain '{}'", s)).into(),
                )
            }
        };
        Ok(domain)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An attribute value.
///
/// Values of different domains are never equal. Floating point values are
/// compared by their total order, thus `NaN` equals itself and values can be
/// used as keys.
#[derive(Clone, Debug)]
pub enum Value {
    Long(i64),
    Integer(i32),
    Short(i16),
    Byte(i8),
    Double(f64),
    Float(f32),
    Character(char),
    String(String),
}

impl Value {
    pub fn domain(&self) -> Domain {
        match self {
            Value::Long(_) => Domain::Long,
            Value::Integer(_) => Domain::Integer,
            Value::Short(_) => Domain::Short,
            Value::Byte(_) => Domain::Byte,
            Value::Double(_) => Domain::Double,
            Value::Float(_) => Domain::Float,
            Value::Character(_) => Domain::Character,
            Value::String(_) => Domain::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Widens integral values to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Long(v) => Some(v),
            Value::Integer(v) => Some(v.into()),
            Value::Short(v) => Some(v.into()),
            Value::Byte(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Widens numeric values to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Double(v) => Some(v),
            Value::Float(v) => Some(v.into()),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Long(_) => 0,
            Value::Integer(_) => 1,
            Value::Short(_) => 2,
            Value::Byte(_) => 3,
            Value::Double(_) => 4,
            Value::Float(_) => 5,
            Value::Character(_) => 6,
            Value::String(_) => 7,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders by domain first, then by value.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Long(a), Value::Long(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Short(a), Value::Short(b)) => a.cmp(b),
            (Value::Byte(a), Value::Byte(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Character(a), Value::Character(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Long(v) => v.hash(state),
            Value::Integer(v) => v.hash(state),
            Value::Short(v) => v.hash(state),
            Value::Byte(v) => v.hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Character(v) => v.hash(state),
            Value::String(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Long(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Character(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
        }
    }
}

macro_rules! impl_from {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_from!(i64, Long);
impl_from!(i32, Integer);
impl_from!(i16, Short);
impl_from!(i8, Byte);
impl_from!(f64, Double);
impl_from!(f32, Float);
impl_from!(char, Character);
impl_from!(String, String);

impl<'a> From<&'a str> for Value {
    fn from(v: &'a str) -> Self {
        Value::String(v.to_string())
    }
}
