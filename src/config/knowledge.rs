// src/config/knowledge.rs
//! Curated, versioned facts per family: board-code table, manual overrides,
//! memory-class translation and last-resort memory defaults.
//!
//! The data lives in `data/<family>.toml` and is embedded at build time; a
//! different file can be loaded with [`KnowledgeBase::from_path`].
//!
//! File layout:
//! ```toml
//! family = "iPad"
//!
//! [[board]]            # ordered; earlier entries win on overlapping prefixes
//! code = "j720ap"
//! chip = "M4"
//!
//! [[override]]         # any of chip / memory / identifier may be omitted
//! name = "iPad Air (4th generation)"
//! chip = "A14"
//! memory = "4 GB"
//!
//! [[memory_class]]
//! class = 4
//! memory = "4 GB"
//!
//! [memory_default]
//! baseline = "8 GB"
//! tiers = [{ qualifier = "Pro", memory = "16 GB" }]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::options::Family;
use crate::error::{Error, Result};
use crate::resolve::board::{BoardMapping, BoardTable};

const IPHONE_TOML: &str = include_str!("../../data/iphone.toml");
const IPAD_TOML: &str = include_str!("../../data/ipad.toml");
const MAC_TOML: &str = include_str!("../../data/mac.toml");

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Override {
    pub name: String,
    pub chip: Option<String>,
    pub memory: Option<String>,
    /// Whitespace-separated product codes; more than one gives a
    /// multi-valued identifier.
    pub identifier: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct MemoryClass {
    pub class: i64,
    pub memory: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct MemoryTier {
    pub qualifier: String,
    pub memory: String,
}

/// Heuristic memory when no source knows better: the first tier whose
/// qualifier appears in the resolved chip name, else the baseline.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct MemoryDefault {
    pub baseline: String,
    #[serde(default)]
    pub tiers: Vec<MemoryTier>,
}

impl MemoryDefault {
    pub fn for_chip(&self, chip: Option<&str>) -> &str {
        chip.and_then(|c| self.tiers.iter().find(|t| c.contains(t.qualifier.as_str())))
            .map(|t| t.memory.as_str())
            .unwrap_or(self.baseline.as_str())
    }
}

#[derive(Deserialize)]
struct RawKnowledge {
    family: String,
    #[serde(default)]
    board: Vec<BoardMapping>,
    #[serde(default, rename = "override")]
    overrides: Vec<Override>,
    #[serde(default)]
    memory_class: Vec<MemoryClass>,
    memory_default: Option<MemoryDefault>,
}

#[derive(Clone, Debug)]
pub struct KnowledgeBase {
    pub family: String,
    pub board: BoardTable,
    /// Kept in file order; the overrides-only catalog is built in this order.
    pub overrides: Vec<Override>,
    pub memory_classes: Vec<MemoryClass>,
    pub memory_default: Option<MemoryDefault>,
    by_name: HashMap<String, usize>,
}

impl KnowledgeBase {
    /// The knowledge base shipped with the crate for `family`.
    pub fn builtin(family: Family) -> Result<Self> {
        let text = match family {
            Family::IPhone => IPHONE_TOML,
            Family::IPad => IPAD_TOML,
            Family::Mac => MAC_TOML,
        };
        Self::from_toml(family.label(), text)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&path.display().to_string(), &text)
    }

    pub fn from_toml(name: &str, text: &str) -> Result<Self> {
        let raw: RawKnowledge = toml::from_str(text).map_err(|e| Error::KnowledgeBase {
            name: s!(name),
            reason: e.to_string(),
        })?;

        let mut by_name = HashMap::with_capacity(raw.overrides.len());
        for (i, o) in raw.overrides.iter().enumerate() {
            if by_name.insert(o.name.clone(), i).is_some() {
                return Err(Error::KnowledgeBase {
                    name: s!(name),
                    reason: format!("override '{}' is listed twice", o.name),
                });
            }
        }

        Ok(Self {
            family: raw.family,
            board: BoardTable::new(raw.board),
            overrides: raw.overrides,
            memory_classes: raw.memory_class,
            memory_default: raw.memory_default,
            by_name,
        })
    }

    /// An empty knowledge base: no overrides, no board codes, no defaults.
    pub fn empty(family: &str) -> Self {
        Self {
            family: s!(family),
            board: BoardTable::new(Vec::new()),
            overrides: Vec::new(),
            memory_classes: Vec::new(),
            memory_default: None,
            by_name: HashMap::new(),
        }
    }

    fn find(&self, name: &str) -> Option<&Override> {
        self.by_name.get(name).map(|&i| &self.overrides[i])
    }

    pub fn chip_override(&self, name: &str) -> Option<&str> {
        self.find(name)?.chip.as_deref()
    }

    pub fn memory_override(&self, name: &str) -> Option<&str> {
        self.find(name)?.memory.as_deref()
    }

    pub fn identifier_override(&self, name: &str) -> Option<&str> {
        self.find(name)?.identifier.as_deref()
    }

    /// Translate a raw memory-class column value.
    pub fn memory_for_class(&self, class: i64) -> Option<&str> {
        self.memory_classes
            .iter()
            .find(|m| m.class == class)
            .map(|m| m.memory.as_str())
    }

    pub fn has_chip_overrides(&self) -> bool {
        self.overrides.iter().any(|o| o.chip.is_some())
    }
}
