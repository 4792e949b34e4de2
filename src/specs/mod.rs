// src/specs/mod.rs
//! # Source reading specs
//!
//! Each spec knows where the ground truth lives in one external source and
//! how to pull it out:
//!
//! - `wiki`: The Apple Wiki family pages (MediaWiki markup). One block per
//!   `== [[Device]] ==` heading; `CPU:` and `RAM:` lines per block.
//! - `device_traits`: Xcode's `device_traits.db` (SQLite). Install
//!   discovery and selection, plus the per-family `Devices` query.
//! - `release_dates`: Wikipedia model tables (HTML), model column and
//!   release-date column.
//!
//! Specs only extract. Deciding which source wins for a field lives in
//! `resolve`; writing the catalog lives in `catalog` and `runner`.
//!
//! ```text
//! runner → specs::wiki::fetch → Extractor::parse_devices ─┐
//!        → specs::device_traits::query ────────────────────┼→ resolve::merge
//!        → specs::release_dates::fetch ───────────────────┘
//! ```
//!
//! Parsing functions take the raw text so they can be tested offline
//! against captured fixtures.
pub mod device_traits;
pub mod release_dates;
pub mod wiki;
