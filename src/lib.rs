// src/lib.rs
//! Apple device catalogs (iPhone, iPad, Mac) reconciled from Xcode's
//! device traits database, The Apple Wiki and Wikipedia release tables.

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod progress;
pub mod resolve;
pub mod runner;
pub mod specs;

pub use catalog::{Catalog, CatalogFile, DeviceRecord, Identifier};
pub use config::options::{Family, FamilyOptions};
pub use error::{Error, Result};
