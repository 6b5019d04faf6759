// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use rand::RngCore;
use sha2::{Digest, Sha256};

use super::{error::PowError, hash::RANDOM_BYTES_LEN, now_unix_seconds};

/// A server-issued PoW puzzle: a timestamp, 32 opaque bytes, and a required
/// difficulty in bits. Immutable once issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub timestamp: i64,
    pub random_bytes: [u8; RANDOM_BYTES_LEN],
    pub difficulty: i32,
}

/// Challenges older than this many seconds are rejected at validation time
/// regardless of nonce.
pub const STALE_AFTER_SECS: i64 = 60;

/// Generates a fresh challenge for the given difficulty.
///
/// `random_bytes` carries `SHA-256(BE64(ts) || rb0)` where `rb0` is fresh
/// entropy from a cryptographic RNG — it is the pre-hashed digest, not raw
/// entropy, and must be used verbatim by validators.
pub fn generate(difficulty: i32) -> Result<Challenge, PowError> {
    if !(0..=256).contains(&difficulty) {
        return Err(PowError::InvalidDifficulty(difficulty));
    }

    let mut rb0 = [0u8; RANDOM_BYTES_LEN];
    rand::rng().fill_bytes(&mut rb0);

    let timestamp = now_unix_seconds();

    let mut hasher = Sha256::new();
    hasher.update(timestamp.to_be_bytes());
    hasher.update(rb0);
    let random_bytes: [u8; 32] = hasher.finalize().into();

    Ok(Challenge {
        timestamp,
        random_bytes,
        difficulty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_difficulty() {
        assert!(generate(-1).is_err());
        assert!(generate(257).is_err());
    }

    #[test]
    fn accepts_boundary_difficulties() {
        for d in [0, 1, 255, 256] {
            assert!(generate(d).is_ok());
        }
    }

    #[test]
    fn random_bytes_vary_between_calls() {
        let a = generate(0).expect("generate");
        let b = generate(0).expect("generate");
        assert_ne!(a.random_bytes, b.random_bytes);
    }
}
