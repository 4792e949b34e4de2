// src/catalog.rs
//! The per-family catalog and its JSON file.
//!
//! A catalog is keyed by display name and keeps first-insertion order; a
//! later record with the same name replaces the earlier one in place. Every
//! insertion is also appended to a log so collisions can be reported after
//! the fact.

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One product code, or several when hardware revisions share a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Single(String),
    Multi(Vec<String>),
}

impl Identifier {
    /// Whitespace-separated codes; one code stays single-valued.
    pub fn parse(codes: &str) -> Self {
        let mut parts: Vec<String> = codes.split_whitespace().map(String::from).collect();
        if parts.len() == 1 {
            Identifier::Single(parts.remove(0))
        } else {
            Identifier::Multi(parts)
        }
    }

    pub fn codes(&self) -> Vec<&str> {
        match self {
            Identifier::Single(c) => vec![c.as_str()],
            Identifier::Multi(cs) => cs.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.codes().join(" "))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "sku")]
    pub identifier: Identifier,
    #[serde(rename = "chip")]
    pub processor: String,
    #[serde(rename = "ram")]
    pub memory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, DeviceRecord>", into = "IndexMap<String, DeviceRecord>")]
pub struct Catalog {
    records: IndexMap<String, DeviceRecord>,
    insertions: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by name. Returns `true` when an earlier record
    /// with the same name was overwritten; the name keeps its first position.
    pub fn insert(&mut self, record: DeviceRecord) -> bool {
        self.insertions.push(record.name.clone());
        self.records.insert(record.name.clone(), record).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&DeviceRecord> {
        self.records.get(name)
    }

    pub fn records(&self) -> impl ExactSizeIterator<Item = &DeviceRecord> {
        self.records.values()
    }

    /// Every name passed to [`insert`](Self::insert), in call order.
    pub fn insertions(&self) -> &[String] {
        &self.insertions
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

// Names live in the map keys on disk.
impl From<IndexMap<String, DeviceRecord>> for Catalog {
    fn from(map: IndexMap<String, DeviceRecord>) -> Self {
        let mut catalog = Catalog::new();
        for (name, mut record) in map {
            record.name = name;
            catalog.insert(record);
        }
        catalog
    }
}

impl From<Catalog> for IndexMap<String, DeviceRecord> {
    fn from(catalog: Catalog) -> Self {
        catalog.records
    }
}

/// The document written to `apple/<Family>.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub date_generated: String,
    pub xcode_version: String,
    pub total_menu: Catalog,
}

impl CatalogFile {
    /// Stamp with the current local time (ISO-8601, microseconds).
    pub fn now(xcode_version: &str, catalog: Catalog) -> Self {
        Self {
            date_generated: chrono::Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            xcode_version: s!(xcode_version),
            total_menu: catalog,
        }
    }

    /// Pretty-print to `path`, replacing any previous file.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|source| Error::Json { path: path.to_path_buf(), source })?;
        fs::write(path, text)?;
        logf!("Catalog: wrote {} records to {}", self.total_menu.len(), path.display());
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| Error::Json { path: path.to_path_buf(), source })
    }
}
