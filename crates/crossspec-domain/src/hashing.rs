//! Deterministic claim hashing and light text normalization

use crate::SourceInfo;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Digest algorithm recorded in every hash
pub const HASH_ALGO: &str = "sha256";

/// Description of the canonical byte layout that was hashed
pub const HASH_BASIS: &str = "raw+identity/v1";

const DOMAIN_TAG: &[u8] = b"crossspec/v1";

/// Integrity digest of a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashInfo {
    /// Digest algorithm
    pub algo: String,
    /// Canonical byte layout identifier
    pub basis: String,
    /// Lower-case hex digest
    pub value: String,
}

/// Hash `text_raw` together with the identity fields of its source
///
/// The canonical representation is the domain tag followed by each field as
/// a little-endian `u64` length and its bytes: text, source path, unit kind,
/// start offset. Timestamps and claim ids are not part of the digest.
pub fn hash_claim(text_raw: &str, source: &SourceInfo) -> HashInfo {
    let (unit_kind, start_offset) = source.identity();
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_TAG);
    update_field(&mut hasher, text_raw.as_bytes());
    update_field(&mut hasher, source.path.as_bytes());
    update_field(&mut hasher, unit_kind.as_bytes());
    update_field(&mut hasher, &start_offset.to_le_bytes());

    HashInfo {
        algo: HASH_ALGO.to_string(),
        basis: HASH_BASIS.to_string(),
        value: hex::encode(hasher.finalize()),
    }
}

/// SHA-256 of raw file bytes, hex encoded
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Collapse whitespace runs into single spaces and trim
pub fn normalize_light(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
