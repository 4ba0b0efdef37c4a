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

use rel_ops::error::Error as RelOpsError;
use std::convert::From;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum ErrorKind {
    CsvError(csv::Error),
    /// A snapshot file doesn't have the expected layout.
    FormatError(String),
    InvalidArgument(String),
    IoError(::std::io::Error),
    /// A snapshot holds a schema or tuple that the relation rejects.
    RelOpsError(RelOpsError),
}

#[derive(Debug)]
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

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self {
            kind: ErrorKind::CsvError(error),
        }
    }
}

impl From<::std::io::Error> for Error {
    fn from(error: ::std::io::Error) -> Self {
        Self {
            kind: ErrorKind::IoError(error),
        }
    }
}

impl From<RelOpsError> for Error {
    fn from(error: RelOpsError) -> Self {
        Self {
            kind: ErrorKind::RelOpsError(error),
        }
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
            ErrorKind::CsvError(ref e) => e.fmt(f),
            ErrorKind::FormatError(ref s) => write!(f, "Format error: {}", s),
            ErrorKind::InvalidArgument(ref s) => write!(f, "Invalid argument: {}", s),
            ErrorKind::IoError(ref e) => e.fmt(f),
            ErrorKind::RelOpsError(ref e) => e.fmt(f),
        }
    }
}
