// src/resolve/audit.rs
//! Duplicate/quality audit of a merged catalog. Reports only; the catalog
//! is never changed.

use std::collections::HashMap;

use crate::catalog::{Catalog, DeviceRecord};
use crate::config::consts::UNKNOWN;
use crate::progress::Progress;

use super::merge::DroppedRecord;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Names inserted more than once, in order of their first repeat.
    pub duplicates: Vec<String>,
    pub unresolved_processor: Vec<String>,
    pub unresolved_memory: Vec<String>,
    /// Records refused by the family membership check.
    pub dropped: Vec<DroppedRecord>,
}

/// Replay the insertion log; the catalog itself has already erased collisions.
pub fn duplicate_keys(insertions: &[String]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut out = Vec::new();
    for name in insertions {
        let n = seen.entry(name.as_str()).or_insert(0);
        *n += 1;
        if *n == 2 {
            out.push(name.clone());
        }
    }
    out
}

fn names_where(catalog: &Catalog, pred: impl Fn(&DeviceRecord) -> bool) -> Vec<String> {
    catalog
        .records()
        .filter(|r| pred(r))
        .map(|r| r.name.clone())
        .collect()
}

pub fn audit(catalog: &Catalog, dropped: &[DroppedRecord]) -> AuditReport {
    AuditReport {
        duplicates: duplicate_keys(catalog.insertions()),
        unresolved_processor: names_where(catalog, |r| r.processor == UNKNOWN),
        unresolved_memory: names_where(catalog, |r| r.memory == UNKNOWN),
        dropped: dropped.to_vec(),
    }
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
            && self.unresolved_processor.is_empty()
            && self.unresolved_memory.is_empty()
            && self.dropped.is_empty()
    }

    /// Log every finding and surface it as a warning.
    pub fn report(&self, progress: &mut dyn Progress) {
        let mut section = |title: &str, names: Vec<String>| {
            if names.is_empty() {
                return;
            }
            logw!("Audit: {title}: {}", names.join(", "));
            progress.warn(&format!("{title} ({}):", names.len()));
            for n in &names {
                progress.log(&format!("  {n}"));
            }
        };

        section("Duplicate names", self.duplicates.clone());
        section("Devices with unresolved chip", self.unresolved_processor.clone());
        section("Devices with unresolved RAM", self.unresolved_memory.clone());
        section(
            "Dropped by family filter",
            self.dropped
                .iter()
                .map(|d| format!("{} (chip '{}' from {})", d.name, d.processor, d.trust))
                .collect(),
        );
    }
}
