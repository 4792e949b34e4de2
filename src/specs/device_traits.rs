// src/specs/device_traits.rs
//! Reading spec for Xcode's `device_traits.db`.
//!
//! Responsibilities:
//! - Find every installed Xcode that ships the database and pick one.
//! - Describe the pick for the output file (`Version X (Build)`).
//! - Query the `Devices` table for one family, read-only.
//!
//! The connection lives only for the duration of [`query`].

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};

use crate::config::consts::{
    DEVICE_TRAITS_REL, PREFERRED_XCODE_MARKERS, XCODEBUILD_REL, XCODE_DEFAULT_BUNDLE,
    XCODE_DEFAULT_LABEL,
};
use crate::config::options::FamilyOptions;
use crate::error::Result;

/// One row of the structured lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupRow {
    pub name: String,
    pub product_type: String,
    pub board_code: String,
    pub platform: String,
    /// `DevicePerformanceMemoryClass`, when the family's query joins it.
    pub memory_class: Option<i64>,
}

impl LookupRow {
    /// Major generation marker of the product type (`iPhone17,3` → 17).
    pub fn generation(&self) -> Option<u32> {
        let (head, _) = self.product_type.split_once(',')?;
        let digits: String = head
            .chars()
            .rev()
            .take_while(char::is_ascii_digit)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        digits.parse().ok()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XcodeInstall {
    pub label: String,
    pub app: PathBuf,
    pub db: PathBuf,
}

/// `Xcode.app` (labelled `Xcode`) and every `Xcode-*.app` (labelled by
/// bundle name) under `root` that carries the database, sorted by label.
pub fn discover(root: &Path) -> Vec<XcodeInstall> {
    let Ok(entries) = fs::read_dir(root) else {
        logw!("Xcode: cannot read {}", root.display());
        return Vec::new();
    };

    let mut found: Vec<XcodeInstall> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let file_name = e.file_name();
            let bundle = file_name.to_str()?;
            let label = if bundle == XCODE_DEFAULT_BUNDLE {
                s!(XCODE_DEFAULT_LABEL)
            } else if bundle.starts_with("Xcode-") && bundle.ends_with(".app") {
                s!(bundle.trim_end_matches(".app"))
            } else {
                return None;
            };
            let app = e.path();
            let db = app.join(DEVICE_TRAITS_REL);
            db.is_file().then_some(XcodeInstall { label, app, db })
        })
        .collect();

    found.sort_by(|a, b| a.label.cmp(&b.label));
    for x in &found {
        logd!("Xcode: found {} at {}", x.label, x.db.display());
    }
    found
}

/// First install whose label carries a preferred marker, else the last.
pub fn select(installs: &[XcodeInstall]) -> Option<&XcodeInstall> {
    installs
        .iter()
        .find(|x| PREFERRED_XCODE_MARKERS.iter().any(|m| x.label.contains(m)))
        .or_else(|| installs.last())
}

/// `xcodebuild -version` output as `Version 16.0 (16A242d)`.
pub fn parse_version_output(out: &str) -> Option<String> {
    let mut lines = out.lines().map(str::trim).filter(|l| !l.is_empty());
    let version = lines.next()?.strip_prefix("Xcode ")?;
    let build = lines.next()?.strip_prefix("Build version ")?;
    Some(format!("Version {version} ({build})"))
}

/// Free-text description of `install` for the output file; the install
/// label when `xcodebuild` cannot be run.
pub fn version_label(install: &XcodeInstall) -> String {
    let tool = install.app.join(XCODEBUILD_REL);
    if !tool.is_file() {
        return install.label.clone();
    }
    match Command::new(&tool).arg("-version").output() {
        Ok(out) if out.status.success() => {
            parse_version_output(&String::from_utf8_lossy(&out.stdout))
                .unwrap_or_else(|| install.label.clone())
        }
        Ok(out) => {
            logw!("Xcode: xcodebuild exited with {}", out.status);
            install.label.clone()
        }
        Err(e) => {
            logw!("Xcode: cannot run {}: {e}", tool.display());
            install.label.clone()
        }
    }
}

fn text_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => s!(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    })
}

fn int_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(t) => std::str::from_utf8(t).ok().and_then(|s| s.trim().parse().ok()),
        _ => None,
    })
}

fn sql(opts: &FamilyOptions) -> &'static str {
    if opts.memory_class_column {
        "SELECT d.ProductDescription, d.ProductType, d.Target, d.Platform,
                dt.DevicePerformanceMemoryClass
         FROM Devices d
         JOIN DeviceTraits dt ON d.DeviceTraitSet = dt.DeviceTraitSetID
         WHERE d.ProductType LIKE ?1
         ORDER BY d.ProductType DESC"
    } else {
        "SELECT d.ProductDescription, d.ProductType, d.Target, d.Platform, NULL
         FROM Devices d
         WHERE d.ProductType LIKE ?1
         ORDER BY d.ProductType DESC"
    }
}

/// Every device row whose product type starts with the family prefix.
/// A database path that does not exist gives zero rows and a warning.
pub fn query(db: &Path, opts: &FamilyOptions) -> Result<Vec<LookupRow>> {
    if !db.is_file() {
        logw!("Lookup: device_traits.db not found at {}", db.display());
        return Ok(Vec::new());
    }

    let conn = Connection::open_with_flags(
        db,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let pattern = join!(opts.product_prefix, "%");
    let mut stmt = conn.prepare(sql(opts))?;
    let rows = stmt
        .query_map([pattern.as_str()], |row| {
            Ok(LookupRow {
                name: text_col(row, 0)?,
                product_type: text_col(row, 1)?,
                board_code: text_col(row, 2)?,
                platform: text_col(row, 3)?,
                memory_class: int_col(row, 4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    logf!("Lookup: {} {} rows from {}", rows.len(), opts.family, db.display());
    Ok(rows)
}
