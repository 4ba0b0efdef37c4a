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

//! Snapshot files.
//!
//! A snapshot is a CSV file with flexible record lengths:
//!
//! 1. header: relation name, index kind, and arity
//! 2. attribute names
//! 3. domain names
//! 4. primary key attribute names
//!
//! Each following record is one tuple. Values are stored in their textual
//! form and parsed back by the domain of their attribute.
//!
//! Saving first writes to a temporary file next to the snapshot, and then
//! renames it. Thus, a failed save never leaves a partial snapshot behind.

use crate::error::{Error, ErrorKind, Result};
use csv::{ReaderBuilder, StringRecord, StringRecordsIter, WriterBuilder};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rel_ops::{Domain, IndexKind, NameSeq, Relation, Value};
use serde_derive::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    name: String,
    index_kind: IndexKind,
    arity: usize,
}

/// Saves and loads relations in a directory.
#[derive(Clone, Debug)]
pub struct Store {
    directory: PathBuf,
    extension: String,
    compress: bool,
    delimiter: u8,
}

/// Build a `Store`.
#[derive(Clone, Debug)]
pub struct StoreBuilder {
    directory: PathBuf,
    extension: String,
    compress: bool,
    delimiter: u8,
}

impl Default for StoreBuilder {
    fn default() -> StoreBuilder {
        StoreBuilder {
            directory: PathBuf::from("store"),
            extension: "dbf".to_string(),
            compress: false,
            delimiter: b',',
        }
    }
}

impl StoreBuilder {
    pub fn directory<P: Into<PathBuf>>(&mut self, directory: P) -> &mut Self {
        self.directory = directory.into();
        self
    }

    pub fn extension(&mut self, extension: &str) -> &mut Self {
        self.extension = extension.to_string();
        self
    }

    /// Compress snapshots with gzip. Adds ".gz" to the file names.
    pub fn compress(&mut self, compress: bool) -> &mut Self {
        self.compress = compress;
        self
    }

    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    /// Builds the store and creates its directory if necessary.
    pub fn build(&self) -> Result<Store> {
        if self.extension.is_empty() || self.extension.contains('/') {
            return Err(ErrorKind::InvalidArgument(format!(
                "Invalid snapshot file extension '{}'",
                self.extension
            ))
            .into());
        }
        if self.delimiter == b'\n' || self.delimiter == b'"' {
            return Err(ErrorKind::InvalidArgument(
                "Delimiter must not be a newline or quote".to_string(),
            )
            .into());
        }

        fs::create_dir_all(&self.directory)?;

        Ok(Store {
            directory: self.directory.clone(),
            extension: self.extension.clone(),
            compress: self.compress,
            delimiter: self.delimiter,
        })
    }
}

impl Store {
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The snapshot path of relation `name`.
    pub fn path(&self, name: &str) -> PathBuf {
        let mut file_name = format!("{}.{}", name, self.extension);
        if self.compress {
            file_name.push_str(".gz");
        }
        self.directory.join(file_name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Deletes the snapshot of relation `name`.
    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        fs::remove_file(&path)?;
        debug!(path = %path.display(), "Removed snapshot");
        Ok(())
    }

    /// Saves `relation`, replacing any previous snapshot of the same name.
    ///
    /// Returns the snapshot path.
    pub fn save(&self, relation: &Relation) -> Result<PathBuf> {
        let path = self.path(relation.name());
        let tmp_path = tmp_path(&path);

        if let Err(e) = self.write_file(relation, &tmp_path) {
            // The temporary file may not exist if its creation failed.
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        debug!(
            relation = %relation.name(),
            path = %path.display(),
            rows = relation.len(),
            "Saved snapshot"
        );
        Ok(path)
    }

    fn write_file(&self, relation: &Relation, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let file = if self.compress {
            let encoder = self.write_records(relation, GzEncoder::new(file, Compression::default()))?;
            encoder.finish()?
        } else {
            self.write_records(relation, file)?
        };
        file.sync_all()?;
        Ok(())
    }

    fn write_records<W: Write>(&self, relation: &Relation, writer: W) -> Result<W> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_writer(writer);

        writer.serialize(Header {
            name: relation.name().to_string(),
            index_kind: relation.index_kind(),
            arity: relation.arity(),
        })?;
        writer.write_record(relation.attributes())?;
        writer.write_record(relation.domains().iter().map(|d| d.name()))?;
        writer.write_record(relation.key())?;

        for tuple in relation.tuples() {
            writer.write_record(tuple.iter().map(Value::to_string))?;
        }

        writer
            .into_inner()
            .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()).into())
    }

    /// Loads the snapshot of relation `name`.
    ///
    /// Derived relations of the loaded relation draw their names from
    /// `names`.
    pub fn load(&self, name: &str, names: &NameSeq) -> Result<Relation> {
        let path = self.path(name);
        let file = File::open(&path)?;
        let reader: Box<dyn Read> = if self.compress {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(reader);
        let mut records = reader.records();

        let header: Header = next_record(&mut records, "header")?.deserialize(None)?;
        if header.name != name {
            return Err(ErrorKind::FormatError(format!(
                "{} holds relation {}, expected {}",
                path.display(),
                header.name,
                name
            ))
            .into());
        }

        let attributes: Vec<String> = next_record(&mut records, "attribute")?
            .iter()
            .map(String::from)
            .collect();
        let domains = next_record(&mut records, "domain")?
            .iter()
            .map(str::parse)
            .collect::<rel_ops::error::Result<Vec<Domain>>>()?;
        let key = next_record(&mut records, "key")?
            .iter()
            .map(String::from)
            .collect();

        if attributes.len() != header.arity {
            return Err(ErrorKind::FormatError(format!(
                "Header of {} declares {} attributes, found {}",
                path.display(),
                header.arity,
                attributes.len()
            ))
            .into());
        }

        let mut relation = Relation::new(
            header.name,
            attributes,
            domains.clone(),
            key,
            header.index_kind,
            names,
        )?;

        for record in records {
            let record = record?;
            if record.len() != header.arity {
                return Err(ErrorKind::FormatError(format!(
                    "Tuple on line {} has {} values, expected {}",
                    record.position().map_or(0, |p| p.line()),
                    record.len(),
                    header.arity
                ))
                .into());
            }

            let tuple = record
                .iter()
                .zip(&domains)
                .map(|(value, domain)| domain.parse_value(value))
                .collect::<rel_ops::error::Result<Vec<Value>>>()?;
            relation.insert(tuple)?;
        }

        debug!(
            relation = %relation.name(),
            path = %path.display(),
            rows = relation.len(),
            "Loaded snapshot"
        );
        Ok(relation)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn next_record<R: Read>(records: &mut StringRecordsIter<'_, R>, what: &str) -> Result<StringRecord> {
    let record = records.next().ok_or_else(|| {
        Error::from(ErrorKind::FormatError(format!("Missing {} record", what)))
    })?;
    Ok(record?)
}
