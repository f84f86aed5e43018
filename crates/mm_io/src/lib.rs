//! crates/mm_io/src/lib.rs
//! Everything that touches bytes: bounded JSON reads, schema checks, snapshot
//! normalization, canonical artifacts and digests. Local files only; any
//! `<scheme>://` path is refused.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Error for every mm_io entry point.
#[derive(Debug, Error)]
pub enum IoError {
    /// Open/read/write/rename failures and refused paths.
    #[error("io/path error: {0}")]
    Path(String),

    /// Input exceeded a size limit.
    #[error("limit exceeded: {0}")]
    Limit(String),

    /// Malformed JSON; `pointer` is "/" when the parser cannot locate it.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// JSON Schema validation failures (first failing instance path).
    #[error("schema error at {pointer}: {msg}")]
    Schema { pointer: String, msg: String },

    #[error("hash error: {0}")]
    Hash(String),

    /// Semantic problems found while normalizing inputs.
    #[error("invalid: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;
pub mod schema;

/// Any `<scheme>://` counts, `file://` included.
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}
