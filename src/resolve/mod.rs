// src/resolve/mod.rs
//! Record linkage and conflict resolution across the three sources.
pub mod audit;
pub mod board;
pub mod facts;
pub mod matcher;
pub mod merge;
pub mod normalize;
