//! crates/mm_io/src/hasher.rs
//!
//! SHA-256 digests over canonical JSON, and the `CMP:` result ID.
//! The ID is computed from the result serialized **without** its `id` field;
//! hex is lowercase.

use serde::Serialize;
use sha2::{Digest, Sha256};

use mm_core::ids::ComparisonId;

use crate::canonical_json::to_canonical_bytes;
use crate::IoError;

/// SHA-256 over the canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    let bytes = to_canonical_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// `CMP:<hex>` of a comparison result (caller passes the id-less view).
pub fn cmp_id_from_canonical<T: Serialize>(value: &T) -> Result<ComparisonId, IoError> {
    let hex = sha256_canonical(value)?;
    ComparisonId::from_hex(&hex).map_err(|e| IoError::Hash(e.to_string()))
}
