// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use super::{
    challenge::{Challenge, STALE_AFTER_SECS},
    hash,
    now_unix_seconds,
};

/// A candidate nonce submitted against a specific `Challenge`. Opaque; only
/// meaningful paired with the challenge it was solved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u64,
}

/// Validates a solution against a challenge.
///
/// Rejects stale challenges (older than [`STALE_AFTER_SECS`]) unconditionally,
/// then checks that `H(ts, rb, nonce)` meets the required difficulty.
pub fn validate(challenge: &Challenge, solution: &Solution) -> bool {
    if now_unix_seconds() - challenge.timestamp > STALE_AFTER_SECS {
        return false;
    }

    let digest = hash::digest(challenge.timestamp, &challenge.random_bytes, solution.nonce);
    hash::leading_zero_bits(&digest) >= challenge.difficulty as u32
}
