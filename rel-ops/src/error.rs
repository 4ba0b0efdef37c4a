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

use std::convert::From;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// Attribute and domain lists disagree, or two relations are not
    /// union-compatible.
    SchemaMismatch(String),
    /// A tuple has the wrong arity or a value outside its domain.
    TupleValidation(String),
    /// An attribute name is not part of the schema.
    AttributeNotFound(String),
    /// A key-based operation on a relation without a usable index.
    IndexUnavailable(String),
    InvalidArgument(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.kind, f)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::SchemaMismatch(ref s) => write!(f, "SchemaMismatch: {}", s),
            ErrorKind::TupleValidation(ref s) => write!(f, "TupleValidation: {}", s),
            ErrorKind::AttributeNotFound(ref s) => write!(f, "AttributeNotFound: {}", s),
            ErrorKind::IndexUnavailable(ref s) => write!(f, "IndexUnavailable: {}", s),
            ErrorKind::InvalidArgument(ref s) => write!(f, "InvalidArgument: {}", s),
        }
    }
}
