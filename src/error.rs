// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a family's catalog run.
/// Resolution misses are never errors; they degrade to `"Unknown"`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} from {url} after {attempts} attempt(s)")]
    Status {
        url: String,
        status: u16,
        attempts: usize,
    },
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("wiki page '{0}' has no revision content")]
    NoRevision(String),
    #[error("no Xcode device_traits.db found under {}", .0.display())]
    NoLookupSource(PathBuf),
    #[error("device lookup query failed: {0}")]
    Lookup(#[from] rusqlite::Error),
    #[error("knowledge base '{name}' is invalid: {reason}")]
    KnowledgeBase { name: String, reason: String },
    #[error("could not find a model / release date table on {0}")]
    NoReleaseTable(String),
    #[error("catalog file {} is malformed: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
