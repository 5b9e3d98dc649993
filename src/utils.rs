//! Hashing helpers shared across caveats.

use alloy_primitives::B256;
use sha3::{Digest, Keccak256};

/// Keccak-256 hash helper.
pub fn keccak256(data: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let digest: [u8; 32] = hasher.finalize().into();
    B256::from(digest)
}
