// src/config/mod.rs
pub mod consts;
pub mod knowledge;
pub mod options;
