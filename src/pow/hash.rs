// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The single hashing rule shared by challenge generation, validation, and
//! solving: `H(ts, rb, n) = SHA-256(BE64(ts) || rb || BE64(n))`.

use sha2::{Digest, Sha256};

/// Length in bytes of the opaque random-bytes field carried by a challenge.
pub const RANDOM_BYTES_LEN: usize = 32;

/// Computes `H(ts, rb, n)` as defined by the hashing rule.
///
/// `rb` is used verbatim — callers must not re-hash it.
pub fn digest(timestamp: i64, random_bytes: &[u8], nonce: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(timestamp.to_be_bytes());
    hasher.update(random_bytes);
    hasher.update(nonce.to_be_bytes());
    hasher.finalize().into()
}

/// Counts leading zero bits MSB-first across a 32-byte digest. A whole zero
/// byte contributes 8; an all-zero digest is 256.
pub fn leading_zero_bits(digest: &[u8; 32]) -> u32 {
    let mut count = 0u32;
    for byte in digest {
        if *byte == 0 {
            count += 8;
            continue;
        }
        count += byte.leading_zeros();
        break;
    }
    count
}
